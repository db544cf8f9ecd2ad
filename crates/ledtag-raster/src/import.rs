//! Bitmap import from ordinary image files.
//!
//! Dark ("ink") pixels become lit LEDs. Transparent pixels stay unlit.

use std::path::Path;

use image::DynamicImage;

use crate::canvas::MonoCanvas;
use crate::error::Result;

/// Widest image accepted, in pixels. Wider images are cropped.
pub const MAX_IMPORT_WIDTH: u32 = 4096;

const INK_THRESHOLD: u8 = 128;
const OPAQUE_THRESHOLD: u8 = 128;

/// Decode an image file into a canvas of exactly `height` rows.
pub fn import_image(path: impl AsRef<Path>, height: u32) -> Result<MonoCanvas> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "importing image");
    import_image_bytes(&bytes, height)
}

/// Decode an in-memory image into a canvas of exactly `height` rows.
///
/// Taller images are cropped to the top `height` rows; shorter ones are
/// padded with unlit rows. Width is capped at [`MAX_IMPORT_WIDTH`].
pub fn import_image_bytes(bytes: &[u8], height: u32) -> Result<MonoCanvas> {
    let image = image::load_from_memory(bytes)?;
    Ok(threshold(&image, height))
}

fn threshold(image: &DynamicImage, height: u32) -> MonoCanvas {
    let luma = image.to_luma_alpha8();
    let width = luma.width().min(MAX_IMPORT_WIDTH);
    if luma.width() > MAX_IMPORT_WIDTH {
        tracing::warn!(
            width = luma.width(),
            max = MAX_IMPORT_WIDTH,
            "image too wide, cropping"
        );
    }

    let mut canvas = MonoCanvas::new(width, height);
    for y in 0..height.min(luma.height()) {
        for x in 0..width {
            let [value, alpha] = luma.get_pixel(x, y).0;
            if value < INK_THRESHOLD && alpha >= OPAQUE_THRESHOLD {
                canvas.set_pixel(x as i32, y as i32, true);
            }
        }
    }
    canvas
}
