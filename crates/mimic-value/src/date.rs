//! Date values: an epoch-milliseconds timestamp plus an object part for
//! extra own properties.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::error::{ValueError, ValueResult};
use crate::object::GraphObject;

/// A date value.
pub struct DateValue {
    object: Rc<GraphObject>,
    epoch_ms: Cell<f64>,
}

impl DateValue {
    /// Create a date from milliseconds since the Unix epoch.
    pub fn new(epoch_ms: f64) -> Self {
        Self {
            object: Rc::new(GraphObject::new(None)),
            epoch_ms: Cell::new(epoch_ms),
        }
    }

    /// The current instant.
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp_millis() as f64)
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> f64 {
        self.epoch_ms.get()
    }

    /// Replace the timestamp.
    pub fn set_timestamp(&self, epoch_ms: f64) {
        self.epoch_ms.set(epoch_ms);
    }

    /// The object part holding extra own properties.
    pub fn object(&self) -> &Rc<GraphObject> {
        &self.object
    }

    /// ISO-8601 rendering of the timestamp. Fails for non-finite or
    /// out-of-range timestamps.
    pub fn to_iso_string(&self) -> ValueResult<String> {
        let ms = self.epoch_ms.get();
        if !ms.is_finite() {
            return Err(ValueError::InvalidTimestamp(ms));
        }
        let instant: DateTime<Utc> = DateTime::from_timestamp_millis(ms as i64)
            .ok_or(ValueError::InvalidTimestamp(ms))?;
        Ok(instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
    }

    /// Fresh instance with the same timestamp and an empty property table.
    pub fn duplicate(&self) -> Self {
        Self::new(self.epoch_ms.get())
    }
}

impl fmt::Debug for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({})", self.epoch_ms.get())
    }
}
