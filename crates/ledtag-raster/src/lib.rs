//! Rasterization collaborators for LED name tag designs.
//!
//! Two sources produce monochrome pixels for a message:
//! - A [`GlyphRasterizer`] draws text into a row-major [`MonoCanvas`]
//! - The image importer (behind the `image` feature) thresholds a picture
//!   file into the same canvas type
//!
//! The canvas is the hand-off point. Converting it into the device's
//! column-major layout is the packet crate's job.

pub mod canvas;
pub mod error;
#[cfg(feature = "image")]
pub mod import;
pub mod mono;
pub mod traits;

pub use canvas::MonoCanvas;
pub use error::{RasterError, Result};
#[cfg(feature = "image")]
pub use import::{import_image, import_image_bytes, MAX_IMPORT_WIDTH};
pub use mono::{is_known_font, MonoFontRasterizer, DEFAULT_FONT, FONT_NAMES};
pub use traits::{GlyphRasterizer, RenderRequest, RenderedText};
