//! Live clock backed by the system time.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Clock that reads the real current time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
