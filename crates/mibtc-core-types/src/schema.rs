//! Canonical field keys and event names for structured logging
//!
//! Lifecycle events emitted by `log_op_start!`/`log_op_end!`/`log_op_error!`
//! and the detail events of the registry and write engine share these keys.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Subjects
pub const FIELD_TYPE_NAME: &str = "type_name";
pub const FIELD_OBJECT: &str = "object";
pub const FIELD_OID: &str = "oid";
pub const FIELD_TABLE: &str = "table";

// Batch shape
pub const FIELD_VARBINDS: &str = "varbinds";
pub const FIELD_WRITE_MODE: &str = "write_mode";

pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
