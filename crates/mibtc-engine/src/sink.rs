//! Change notifications for the persistence collaborator
//!
//! Delivery is fire-and-forget: a sink error is logged and never undoes a
//! commit.

use chrono::{DateTime, Utc};
use mibtc_core::errors::{ExError, ExErrorKind};
use mibtc_core::{Oid, Value};
use serde::Serialize;

/// One committed change; `value` is `None` when the instance was removed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeNotification {
    pub path: Oid,
    pub value: Option<Value>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Change sink failed: {0}")]
pub struct SinkError(pub String);

impl From<SinkError> for ExError {
    fn from(err: SinkError) -> Self {
        ExError::new(ExErrorKind::Persistence)
            .with_op("record_change")
            .with_message(err.to_string())
    }
}

pub trait ChangeSink: Send + Sync {
    /// # Errors
    ///
    /// `SinkError` if the change could not be handed on.
    fn record(&self, change: &ChangeNotification) -> Result<(), SinkError>;
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn record(&self, _change: &ChangeNotification) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serializes_removal_as_null() {
        let change = ChangeNotification {
            path: Oid::new(vec![1, 3, 6, 1, 4, 1, 9999, 1, 0]),
            value: None,
            at: Utc::now(),
        };

        let json = serde_json::to_value(&change).unwrap();

        assert_eq!(json["path"], serde_json::json!([1, 3, 6, 1, 4, 1, 9999, 1, 0]));
        assert!(json["value"].is_null());
    }

    #[test]
    fn test_sink_error_maps_to_persistence() {
        let err: ExError = SinkError("disk full".to_string()).into();
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert!(err.message().contains("disk full"));
    }
}
