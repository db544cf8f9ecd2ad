//! Per-message display modes and the bit-packing of the mode and flag bytes.
//!
//! Each message is sent as one mode byte: speed in the high nibble,
//! animation index in the low nibble. Flash and border are one bit per
//! message, bit `i` for message `i`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::SLOT_COUNT;
use crate::error::{PacketError, Result};

/// On-device scroll/transition effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Animation {
    #[default]
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
    Freeze = 4,
    Animate = 5,
    Pileup = 6,
    Split = 7,
    Laser = 8,
    Smooth = 9,
    Rotate = 10,
}

impl Animation {
    /// All animations in wire order.
    pub const ALL: [Animation; 11] = [
        Animation::Left,
        Animation::Right,
        Animation::Up,
        Animation::Down,
        Animation::Freeze,
        Animation::Animate,
        Animation::Pileup,
        Animation::Split,
        Animation::Laser,
        Animation::Smooth,
        Animation::Rotate,
    ];

    /// Wire index (0..=10).
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Animation::Left => "Left",
            Animation::Right => "Right",
            Animation::Up => "Up",
            Animation::Down => "Down",
            Animation::Freeze => "Freeze",
            Animation::Animate => "Animate",
            Animation::Pileup => "Pileup",
            Animation::Split => "Split",
            Animation::Laser => "Laser",
            Animation::Smooth => "Smooth",
            Animation::Rotate => "Rotate",
        }
    }
}

impl TryFrom<u8> for Animation {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(PacketError::AnimationOutOfRange(value))
    }
}

impl FromStr for Animation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|anim| anim.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown animation: {s}"))
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scroll speed, 0..=15 on the wire.
///
/// Editors usually present this as 1..=16; see [`Speed::from_display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(0);
    pub const MAX: Speed = Speed(15);

    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX.0 {
            return Err(PacketError::SpeedOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Build from the 1-based value shown to users.
    pub fn from_display(value: u8) -> Result<Self> {
        match value.checked_sub(1) {
            Some(raw) => Self::new(raw),
            None => Err(PacketError::SpeedOutOfRange(value)),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The 1-based value shown to users.
    pub fn display(self) -> u8 {
        self.0 + 1
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Speed {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Speed> for u8 {
    fn from(value: Speed) -> Self {
        value.0
    }
}

/// Pack a validated speed and animation into a mode byte.
pub fn mode_byte(speed: Speed, animation: Animation) -> u8 {
    (speed.get() << 4) | animation.index()
}

/// Pack raw integers into a mode byte, rejecting values that would
/// spill into the neighbouring nibble.
pub fn pack_mode(speed: u8, animation: u8) -> Result<u8> {
    let speed = Speed::new(speed)?;
    let animation = Animation::try_from(animation)?;
    Ok(mode_byte(speed, animation))
}

/// Split a mode byte into raw `(speed, animation)` nibbles.
pub fn unpack_mode(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

/// Pack one flag per message into a byte, bit `i` for message `i`.
///
/// Flags past the eighth are ignored.
pub fn flag_byte<I>(flags: I) -> u8
where
    I: IntoIterator<Item = bool>,
{
    flags
        .into_iter()
        .take(SLOT_COUNT)
        .enumerate()
        .fold(0u8, |acc, (i, on)| acc | (u8::from(on) << i))
}

/// Unpack a flag byte into one boolean per message.
pub fn flag_bits(byte: u8) -> [bool; SLOT_COUNT] {
    std::array::from_fn(|i| byte & (1 << i) != 0)
}
