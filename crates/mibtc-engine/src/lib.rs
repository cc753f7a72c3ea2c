//! mibtc Engine - Registration and transactional writes
//!
//! Takes the object space generated by `mibtc-core` and makes it live:
//! registers every object with an injected protocol engine, then serves
//! atomic (or, where unavoidable, sequential) multi-varbind writes with
//! row lifecycle handling, per-row locking and engine rollback.

pub mod agent;
pub mod engine;
pub mod errors;
pub mod instances;
pub mod locks;
pub mod memory;
pub mod registration;
pub mod sink;
pub mod write;

pub use agent::Agent;
pub use engine::{Handle, ProtocolEngine, RepresentationKind};
pub use errors::{EngineError, RegistrationFailure, WriteFailure};
pub use instances::{InstanceStore, RowKey};
pub use memory::{InMemoryEngine, SymbolKind};
pub use registration::{Registrar, RegistrationReport, SkippedObject};
pub use sink::{ChangeNotification, ChangeSink, NullSink, SinkError};
pub use write::{Varbind, WriteEngine, WriteMode, WriteOptions, WriteOutcome};
