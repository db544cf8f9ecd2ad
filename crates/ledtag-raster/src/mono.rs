use embedded_graphics::geometry::Dimensions;
use embedded_graphics::mono_font::{ascii, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;

use crate::canvas::MonoCanvas;
use crate::error::{RasterError, Result};
use crate::traits::{GlyphRasterizer, RenderRequest, RenderedText};

/// Font used by new messages.
pub const DEFAULT_FONT: &str = "6x10";

/// Every font descriptor [`MonoFontRasterizer`] understands.
pub const FONT_NAMES: &[&str] = &[
    "4x6", "5x7", "5x8", "6x9", "6x10", "6x12", "6x13", "6x13B", "6x13I", "7x13", "7x13B",
    "7x13I", "7x14", "7x14B", "8x13", "8x13B", "8x13I", "9x15", "9x15B", "9x18", "9x18B",
    "10x20",
];

fn lookup(name: &str) -> Option<&'static MonoFont<'static>> {
    let font = match name {
        "4x6" => &ascii::FONT_4X6,
        "5x7" => &ascii::FONT_5X7,
        "5x8" => &ascii::FONT_5X8,
        "6x9" => &ascii::FONT_6X9,
        "6x10" => &ascii::FONT_6X10,
        "6x12" => &ascii::FONT_6X12,
        "6x13" => &ascii::FONT_6X13,
        "6x13B" => &ascii::FONT_6X13_BOLD,
        "6x13I" => &ascii::FONT_6X13_ITALIC,
        "7x13" => &ascii::FONT_7X13,
        "7x13B" => &ascii::FONT_7X13_BOLD,
        "7x13I" => &ascii::FONT_7X13_ITALIC,
        "7x14" => &ascii::FONT_7X14,
        "7x14B" => &ascii::FONT_7X14_BOLD,
        "8x13" => &ascii::FONT_8X13,
        "8x13B" => &ascii::FONT_8X13_BOLD,
        "8x13I" => &ascii::FONT_8X13_ITALIC,
        "9x15" => &ascii::FONT_9X15,
        "9x15B" => &ascii::FONT_9X15_BOLD,
        "9x18" => &ascii::FONT_9X18,
        "9x18B" => &ascii::FONT_9X18_BOLD,
        "10x20" => &ascii::FONT_10X20,
        _ => return None,
    };
    Some(font)
}

/// Whether `name` names a built-in font. Surrounding whitespace is ignored.
pub fn is_known_font(name: &str) -> bool {
    lookup(name.trim()).is_some()
}

fn font(name: &str) -> Result<&'static MonoFont<'static>> {
    lookup(name.trim()).ok_or_else(|| RasterError::UnknownFont(name.to_string()))
}

/// Rasterizer backed by the fixed-cell ASCII fonts of `embedded-graphics`.
///
/// Font descriptors are cell-size names such as `"6x10"` or `"7x13B"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoFontRasterizer;

impl MonoFontRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl GlyphRasterizer for MonoFontRasterizer {
    fn estimate_width(&self, font_name: &str, text: &str) -> Result<u32> {
        let font = font(font_name)?;
        // Widest line, cells only (character spacing is ignored).
        let cells = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        Ok(cells.saturating_mul(font.character_size.width))
    }

    fn render(
        &self,
        font_name: &str,
        text: &str,
        request: &RenderRequest,
    ) -> Result<RenderedText> {
        let font = font(font_name)?;
        let mut canvas = MonoCanvas::new(request.width, request.height);

        let style = MonoTextStyle::new(font, BinaryColor::On);
        // Outside this range the text misses the canvas entirely.
        let height = i32::try_from(request.height).unwrap_or(i32::MAX);
        let glyph_height = i32::try_from(font.character_size.height).unwrap_or(i32::MAX);
        let offset = request.offset.clamp(-height, glyph_height);
        let origin = Point::new(0, -offset);
        let drawable = Text::with_baseline(text, origin, style, Baseline::Top);
        drawable
            .draw(&mut canvas)
            .unwrap_or_else(|never| match never {});

        let right_edge = drawable
            .bounding_box()
            .bottom_right()
            .map_or(0, |corner| corner.x.saturating_add(1).max(0) as u32);
        let drawn_width = right_edge.min(request.width);

        tracing::trace!(
            font = font_name,
            canvas_width = request.width,
            drawn_width,
            offset = request.offset,
            "rendered text"
        );
        Ok(RenderedText {
            canvas,
            drawn_width,
        })
    }
}
