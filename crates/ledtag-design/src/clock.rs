use chrono::{Datelike, Local, Timelike};
use ledtag_packet::DeviceTimestamp;

/// Source of the header timestamp.
pub trait Clock {
    fn now(&self) -> DeviceTimestamp;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> DeviceTimestamp {
        let now = Local::now();
        DeviceTimestamp::new(
            now.year().clamp(0, i32::from(u16::MAX)) as u16,
            now.month() as u8,
            now.day() as u8,
            now.hour() as u8,
            now.minute() as u8,
            now.second() as u8,
        )
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DeviceTimestamp);

impl Clock for FixedClock {
    fn now(&self) -> DeviceTimestamp {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DeviceTimestamp {
        (**self).now()
    }
}
