use serde::{Deserialize, Serialize};

use crate::{Error, Result, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowID(pub i64);

/// A closed time range of interest, not tied to any robot. Windows may overlap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub id: WindowID,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub event_type: String,
}

impl TimeWindow {
    /// Reversed bounds are an error. They're never swapped or clamped.
    pub fn validate(&self) -> Result<()> {
        if self.start_time > self.end_time {
            return Err(Error::InvalidArgument(format!(
                "{:?} starts at {} after it ends at {}",
                self.id, self.start_time, self.end_time
            )));
        }
        Ok(())
    }
}
