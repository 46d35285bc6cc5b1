//! Wall-clock adapter.

use chrono::{Local, NaiveDateTime};

use crate::app::ports::Clock;

/// Local time from the host clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
