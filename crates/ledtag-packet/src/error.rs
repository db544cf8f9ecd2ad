/// Errors that can occur while building, checking or parsing packets.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// The packet header does not start with the `"wang"` magic.
    #[error("invalid packet magic (expected \"wang\")")]
    InvalidMagic,

    /// The input ended before a complete structure could be read.
    #[error("truncated input ({actual} bytes, need {needed})")]
    Truncated { needed: usize, actual: usize },

    /// The packet exceeds the device limit.
    #[error("too much data ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A raw bitmap buffer is not a whole number of 11-row column groups.
    #[error("bitmap buffer of {len} bytes is not a multiple of {height}")]
    RaggedBitmap { len: usize, height: usize },

    /// Animation index does not fit the 4-bit mode nibble.
    #[error("animation index {0} out of range (0..=10)")]
    AnimationOutOfRange(u8),

    /// Speed does not fit the 4-bit mode nibble.
    #[error("speed {0} out of range (0..=15)")]
    SpeedOutOfRange(u8),

    /// The header's length words disagree with the payload that follows.
    #[error("declared payload of {declared} bytes, found {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// An I/O error occurred while writing a packet.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink stopped accepting bytes before the packet was written.
    #[error("sink closed (incomplete packet)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, PacketError>;
