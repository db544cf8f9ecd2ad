use std::fmt;

/// Year encoded as zero in the timestamp field.
pub const EPOCH_YEAR: u16 = 1999;

/// Wall-clock time as embedded in the packet header.
///
/// Layout of the 64-bit field (big-endian on the wire):
/// ```text
/// bits 40..   year - 1999
/// bits 32..40 month
/// bits 24..32 day
/// bits 16..24 hour
/// bits  8..16 minute
/// bits  0..8  second
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DeviceTimestamp {
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Pack into the header field. Years before 1999 encode as zero.
    pub fn to_bits(self) -> u64 {
        (u64::from(self.year.saturating_sub(EPOCH_YEAR)) << 40)
            | (u64::from(self.month) << 32)
            | (u64::from(self.day) << 24)
            | (u64::from(self.hour) << 16)
            | (u64::from(self.minute) << 8)
            | u64::from(self.second)
    }

    pub fn from_bits(bits: u64) -> Self {
        let year_offset = (bits >> 40).min(u64::from(u16::MAX - EPOCH_YEAR)) as u16;
        Self {
            year: EPOCH_YEAR + year_offset,
            month: (bits >> 32) as u8,
            day: (bits >> 24) as u8,
            hour: (bits >> 16) as u8,
            minute: (bits >> 8) as u8,
            second: bits as u8,
        }
    }
}

impl fmt::Display for DeviceTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
