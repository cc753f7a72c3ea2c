//! Structured logging facility
//!
//! - Single initialization point via `init(profile)` / `init_with_filter`
//! - Lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for assertions on emitted events
//!
//! Boundary ownership: the engine crate emits the lifecycle events for
//! `register_object_space` and `write_apply`. The registry, canonicalizer and
//! default synthesizer only emit `debug!`/`warn!` detail events.
//!
//! ```rust
//! use mibtc_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_with_filter, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
