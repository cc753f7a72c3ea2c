//! Lifecycle logging macros
//!
//! Every operation that owns its lifecycle emits one `start` event and then
//! exactly one of `end` or `end_error`:
//!
//! | Operation               | Owner                              | Extra fields                                    |
//! |-------------------------|------------------------------------|-------------------------------------------------|
//! | `agent_bootstrap`       | `mibtc_engine::Agent::bootstrap`   | `types`, `records`; failure counts at the end   |
//! | `register_object_space` | `mibtc_engine::Registrar`          | `scalars`, `tables`; `registered`, `skipped`    |
//! | `write_apply`           | `mibtc_engine::WriteEngine::apply` | `request_id`, `varbinds`; `write_mode`, `changes` |
//!
//! Extra fields use `tracing` field syntax and follow the fixed ones. The
//! expansions name `tracing` and `mibtc_core_types` by path, so calling
//! crates depend on both.

/// `start` event of an operation
///
/// ```
/// # use mibtc_core::log_op_start;
/// log_op_start!("agent_bootstrap");
/// log_op_start!("write_apply", request_id = "req-7", varbinds = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = mibtc_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// `end` event of an operation; `duration_ms` is required
///
/// ```
/// # use mibtc_core::log_op_end;
/// log_op_end!("register_object_space", duration_ms = 12, registered = 6, skipped = 0);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = mibtc_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// `end_error` event of an operation
///
/// `err` is anything convertible into `ExError`; its kind and stable code
/// become the `err_kind` and `err_code` fields.
///
/// ```
/// # use mibtc_core::{log_op_error, errors::MibError};
/// let err = MibError::DuplicateType { type_name: "DisplayString".to_string() };
/// log_op_error!("agent_bootstrap", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = mibtc_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*)?
        )
    }};
}
