//! Sources of values computed at read time
//!
//! A behaviour record may bind an object to a named function instead of a
//! stored value. The only function the records use is `uptime`.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::model::Value;

pub trait DynamicProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Current value; must have the shape of the object's base kind
    fn sample(&self) -> Value;
}

/// Hundredths of a second since construction, as `TimeTicks`
#[derive(Debug)]
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicProvider for Uptime {
    fn name(&self) -> &str {
        "uptime"
    }

    fn sample(&self) -> Value {
        let ticks = self.started.elapsed().as_millis() / 10;
        // TimeTicks wraps at 2^32
        Value::Unsigned((ticks % (1u128 << 32)) as u64)
    }
}

/// Look up a provider by the name used in behaviour records
pub fn by_name(name: &str) -> Option<Arc<dyn DynamicProvider>> {
    match name {
        "uptime" => Some(Arc::new(Uptime::new())),
        _ => None,
    }
}
