use crate::canvas::MonoCanvas;
use crate::error::Result;

/// Canvas geometry for one text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Vertical shift; text is drawn with its top at `y = -offset`.
    pub offset: i32,
}

/// Result of drawing text.
#[derive(Debug, Clone)]
pub struct RenderedText {
    pub canvas: MonoCanvas,
    /// Width actually covered by the drawn text, at most the canvas width.
    pub drawn_width: u32,
}

/// Draws text into monochrome pixels.
///
/// Implementations are pure: the same font, text and request always give
/// the same canvas. Pixels falling outside the canvas are clipped.
pub trait GlyphRasterizer {
    /// Rough natural width of `text` in pixels. Allowed to undercount.
    fn estimate_width(&self, font: &str, text: &str) -> Result<u32>;

    /// Draw `text` without antialiasing and measure the drawn width.
    fn render(&self, font: &str, text: &str, request: &RenderRequest) -> Result<RenderedText>;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &R {
    fn estimate_width(&self, font: &str, text: &str) -> Result<u32> {
        (**self).estimate_width(font, text)
    }

    fn render(&self, font: &str, text: &str, request: &RenderRequest) -> Result<RenderedText> {
        (**self).render(font, text, request)
    }
}
