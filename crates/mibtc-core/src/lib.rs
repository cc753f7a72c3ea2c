//! mibtc Core - Textual-convention type resolution and object generation
//!
//! This crate provides the type pipeline for an SNMP agent built from
//! declarative MIB records, including:
//! - Type nodes, canonical type descriptions and the base-kind model
//! - Constraint canonicalization (dominance pruning, inherited full ranges)
//! - The type registry, resolving every convention down to a primitive
//! - Default value synthesis with a pluggable provider chain
//! - Object-space generation from behaviour records (scalars and tables)
//! - The RowStatus lifecycle state machine
//!
//! Registration with a protocol engine and the write path live in
//! `mibtc-engine`.

pub mod canonical;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod dynamic;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod row_status;

// Re-export commonly used types
pub use canonical::canonicalize;
pub use catalog::{build_object_space, export_types, ObjectRecord, ObjectSpaceReport};
pub use config::AgentConfig;
pub use defaults::{DefaultProvider, DefaultSynthesizer};
pub use errors::{ExError, ExErrorKind, MibError, Result};
pub use model::{
    Access, BaseKind, CanonicalTypeInfo, ConstraintNode, ObjectEntry, ObjectSpace, Oid, TableDef,
    TypeNode, Value, ValueSemantics,
};
pub use registry::{TypeRegistry, TypeRegistryBuilder};
pub use row_status::{RowState, RowStatus};
