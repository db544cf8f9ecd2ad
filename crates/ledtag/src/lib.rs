//! Message designs for 11x44 monochrome LED name tags.
//!
//! ledtag turns up to eight scrolling messages into the single bytestream
//! the name tag expects over USB. Getting the bytes onto the device is left
//! to an external uploader.
//!
//! # Crate Structure
//!
//! - [`packet`]: column-major bitmaps and the 64-byte packet header
//! - [`raster`]: glyph rasterizer boundary and image import
//! - [`design`]: message slots and design files

/// Re-export packet types.
pub mod packet {
    pub use ledtag_packet::*;
}

/// Re-export rasterization types.
pub mod raster {
    pub use ledtag_raster::*;
}

/// Re-export design types.
pub mod design {
    pub use ledtag_design::*;
}
