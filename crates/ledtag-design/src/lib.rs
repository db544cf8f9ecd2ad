//! Name tag designs: eight message slots and their packet serialization.
//!
//! A [`DeviceConfig`] owns exactly eight [`MessageSlot`]s. Each slot gets
//! its bitmap either inline (imported image) or by rasterizing its text.
//! Serialization resolves every active slot and hands the bitmaps to the
//! packet codec together with the current time.

pub mod clock;
pub mod config;
pub mod error;
pub mod persist;
pub mod slot;

pub use clock::{Clock, FixedClock, LocalClock};
pub use config::DeviceConfig;
pub use error::{DesignError, Result};
pub use persist::DESIGN_FORMAT;
pub use slot::{BitmapSource, MessageSlot, ResolveConfig, TextSource};
