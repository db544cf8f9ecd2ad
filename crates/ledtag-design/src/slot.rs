use ledtag_packet::{Animation, Bitmap, Speed, HEIGHT, MAX_WIDTH_PX};
use ledtag_raster::{GlyphRasterizer, RenderRequest, DEFAULT_FONT};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Text to rasterize for a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSource {
    pub text: String,
    /// Font descriptor understood by the rasterizer.
    pub font: String,
    /// Vertical shift in pixels; positive values move the text up.
    pub offset: i32,
}

impl Default for TextSource {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: DEFAULT_FONT.to_string(),
            offset: 0,
        }
    }
}

/// Where a message's bitmap comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BitmapSource {
    /// A stored bitmap, used as-is and never regenerated.
    Inline { bitmap: Bitmap },
    /// Rasterized from text every time it is needed.
    Generated(TextSource),
}

impl Default for BitmapSource {
    fn default() -> Self {
        Self::Generated(TextSource::default())
    }
}

/// Tuning for text rasterization.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Canvas width as a multiple of the rasterizer's width estimate.
    /// Estimates undercount, so the text is drawn on a wider canvas and
    /// re-measured. Default: 2.
    pub width_margin: u32,
    /// Widest bitmap produced from text, in pixels. Default: 4096.
    pub max_width_px: u32,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            width_margin: 2,
            max_width_px: MAX_WIDTH_PX as u32,
        }
    }
}

/// One of the eight messages on the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSlot {
    /// Inactive messages are sent with no bitmap.
    pub active: bool,
    pub flash: bool,
    pub border: bool,
    pub animation: Animation,
    pub speed: Speed,
    pub source: BitmapSource,
}

impl MessageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// An active message showing `text` in the default font.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            active: true,
            source: BitmapSource::Generated(TextSource {
                text: text.into(),
                ..TextSource::default()
            }),
            ..Self::default()
        }
    }

    /// An active message showing a stored bitmap.
    pub fn with_bitmap(bitmap: Bitmap) -> Self {
        Self {
            active: true,
            source: BitmapSource::Inline { bitmap },
            ..Self::default()
        }
    }

    /// The stored bitmap, if the message uses one.
    pub fn inline_bitmap(&self) -> Option<&Bitmap> {
        match &self.source {
            BitmapSource::Inline { bitmap } => Some(bitmap),
            BitmapSource::Generated(_) => None,
        }
    }

    /// The text settings, if the message is rasterized from text.
    pub fn text_source(&self) -> Option<&TextSource> {
        match &self.source {
            BitmapSource::Generated(text) => Some(text),
            BitmapSource::Inline { .. } => None,
        }
    }

    /// Text settings for editing. A message holding a stored bitmap is
    /// switched back to default text first.
    pub fn text_source_mut(&mut self) -> &mut TextSource {
        match self.source {
            BitmapSource::Generated(ref mut text) => text,
            BitmapSource::Inline { .. } => {
                self.source = BitmapSource::default();
                self.text_source_mut()
            }
        }
    }

    pub fn set_inline_bitmap(&mut self, bitmap: Bitmap) {
        self.source = BitmapSource::Inline { bitmap };
    }

    /// Drop a stored bitmap and go back to default text.
    pub fn clear_inline_bitmap(&mut self) {
        if self.inline_bitmap().is_some() {
            self.source = BitmapSource::default();
        }
    }

    /// Resolve the bitmap with default tuning.
    pub fn resolve_bitmap<R>(&self, rasterizer: &R) -> Result<Bitmap>
    where
        R: GlyphRasterizer + ?Sized,
    {
        self.resolve_bitmap_with(rasterizer, &ResolveConfig::default())
    }

    /// Resolve the bitmap to display.
    ///
    /// A stored bitmap is returned as-is (sharing its buffer) without
    /// touching the rasterizer. Text is rasterized fresh on each call; empty
    /// text or a zero width estimate gives an absent bitmap.
    pub fn resolve_bitmap_with<R>(&self, rasterizer: &R, config: &ResolveConfig) -> Result<Bitmap>
    where
        R: GlyphRasterizer + ?Sized,
    {
        match &self.source {
            BitmapSource::Inline { bitmap } => Ok(bitmap.clone()),
            BitmapSource::Generated(text) => rasterize(text, rasterizer, config),
        }
    }
}

fn rasterize<R>(source: &TextSource, rasterizer: &R, config: &ResolveConfig) -> Result<Bitmap>
where
    R: GlyphRasterizer + ?Sized,
{
    if source.text.is_empty() {
        return Ok(Bitmap::empty());
    }
    let estimate = rasterizer.estimate_width(&source.font, &source.text)?;
    if estimate == 0 {
        return Ok(Bitmap::empty());
    }

    let request = RenderRequest {
        width: estimate.saturating_mul(config.width_margin.max(1)),
        height: HEIGHT as u32,
        offset: source.offset,
    };
    let rendered = rasterizer.render(&source.font, &source.text, &request)?;

    let mut width = rendered.drawn_width.min(request.width);
    if width > config.max_width_px {
        tracing::warn!(
            width,
            max = config.max_width_px,
            "rendered text too wide, cropping"
        );
        width = config.max_width_px;
    }
    tracing::trace!(estimate, canvas_width = request.width, width, "rasterized message");

    let canvas = &rendered.canvas;
    Ok(Bitmap::from_row_major(
        canvas.as_bytes(),
        canvas.stride(),
        width as usize,
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::{Cell, RefCell};

    use ledtag_raster::{MonoCanvas, MonoFontRasterizer, RasterError, RenderedText};

    use super::*;
    use crate::error::DesignError;

    /// Rasterizer that lights every pixel of its drawn width and records calls.
    pub(crate) struct MockRasterizer {
        pub estimate: u32,
        pub drawn: u32,
        pub calls: Cell<usize>,
        pub requests: RefCell<Vec<RenderRequest>>,
    }

    impl MockRasterizer {
        pub(crate) fn new(estimate: u32, drawn: u32) -> Self {
            Self {
                estimate,
                drawn,
                calls: Cell::new(0),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl GlyphRasterizer for MockRasterizer {
        fn estimate_width(&self, font: &str, _text: &str) -> ledtag_raster::Result<u32> {
            self.calls.set(self.calls.get() + 1);
            if font == "missing" {
                return Err(RasterError::UnknownFont(font.to_string()));
            }
            Ok(self.estimate)
        }

        fn render(
            &self,
            _font: &str,
            _text: &str,
            request: &RenderRequest,
        ) -> ledtag_raster::Result<RenderedText> {
            self.calls.set(self.calls.get() + 1);
            self.requests.borrow_mut().push(*request);
            let mut canvas = MonoCanvas::new(request.width, request.height);
            let drawn = self.drawn.min(request.width);
            for y in 0..request.height as i32 {
                for x in 0..drawn as i32 {
                    canvas.set_pixel(x, y, true);
                }
            }
            Ok(RenderedText {
                canvas,
                drawn_width: drawn,
            })
        }
    }

    fn text_slot(text: &str) -> MessageSlot {
        MessageSlot::with_text(text)
    }

    #[test]
    fn default_slot_is_inactive_text() {
        let slot = MessageSlot::new();
        assert!(!slot.active);
        assert!(!slot.flash);
        assert!(!slot.border);
        assert_eq!(slot.animation, Animation::Left);
        assert_eq!(slot.speed.get(), 3);
        let text = slot.text_source().unwrap();
        assert!(text.text.is_empty());
        assert_eq!(text.font, DEFAULT_FONT);
        assert_eq!(text.offset, 0);
    }

    #[test]
    fn inline_bitmap_is_returned_without_rasterizing() {
        let bitmap = Bitmap::from_raw(vec![0x81u8; 3 * HEIGHT]).unwrap();
        let slot = MessageSlot::with_bitmap(bitmap.clone());
        let rasterizer = MockRasterizer::new(10, 10);

        let first = slot.resolve_bitmap(&rasterizer).unwrap();
        let second = slot.resolve_bitmap(&rasterizer).unwrap();

        assert!(first.shares_buffer(&bitmap));
        assert!(second.shares_buffer(&first));
        assert_eq!(rasterizer.calls.get(), 0);
    }

    #[test]
    fn empty_text_is_absent_without_rasterizing() {
        let rasterizer = MockRasterizer::new(10, 10);
        let bitmap = text_slot("").resolve_bitmap(&rasterizer).unwrap();
        assert!(bitmap.is_absent());
        assert_eq!(rasterizer.calls.get(), 0);
    }

    #[test]
    fn zero_estimate_is_absent() {
        let rasterizer = MockRasterizer::new(0, 10);
        let bitmap = text_slot("   ").resolve_bitmap(&rasterizer).unwrap();
        assert!(bitmap.is_absent());
        assert!(rasterizer.requests.borrow().is_empty());
    }

    #[test]
    fn canvas_is_twice_the_estimate_and_cropped_to_drawn_width() {
        let rasterizer = MockRasterizer::new(20, 27);
        let mut slot = text_slot("hello");
        slot.text_source_mut().offset = -3;

        let bitmap = slot.resolve_bitmap(&rasterizer).unwrap();

        let requests = rasterizer.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            RenderRequest {
                width: 40,
                height: HEIGHT as u32,
                offset: -3
            }
        );
        assert_eq!(bitmap.width_bytes(), 4);
        // 27 lit columns: three full groups and three pixels of the fourth.
        assert!(bitmap.is_lit(26, 0));
        assert!(!bitmap.is_lit(27, 0));
    }

    #[test]
    fn width_margin_is_tunable() {
        let rasterizer = MockRasterizer::new(20, 27);
        let config = ResolveConfig {
            width_margin: 3,
            ..ResolveConfig::default()
        };
        text_slot("hello")
            .resolve_bitmap_with(&rasterizer, &config)
            .unwrap();
        assert_eq!(rasterizer.requests.borrow()[0].width, 60);
    }

    #[test]
    fn width_is_capped() {
        let rasterizer = MockRasterizer::new(5000, 9000);
        let bitmap = text_slot("wide").resolve_bitmap(&rasterizer).unwrap();
        assert_eq!(bitmap.width_bytes(), 512);
    }

    #[test]
    fn text_is_regenerated_after_edits() {
        let rasterizer = MonoFontRasterizer;
        let mut slot = text_slot("ab");
        let before = slot.resolve_bitmap(&rasterizer).unwrap();

        slot.text_source_mut().text = "abcdef".to_string();
        let after = slot.resolve_bitmap(&rasterizer).unwrap();

        assert_eq!(before.width_bytes(), 2);
        assert_eq!(after.width_bytes(), 5);
    }

    #[test]
    fn rasterizer_failure_propagates() {
        let rasterizer = MockRasterizer::new(10, 10);
        let mut slot = text_slot("hi");
        slot.text_source_mut().font = "missing".to_string();

        let err = slot.resolve_bitmap(&rasterizer).unwrap_err();
        assert!(matches!(
            err,
            DesignError::Raster(RasterError::UnknownFont(_))
        ));
    }

    #[test]
    fn switching_between_sources() {
        let mut slot = text_slot("keep");
        slot.set_inline_bitmap(Bitmap::from_raw(vec![0u8; HEIGHT]).unwrap());
        assert!(slot.inline_bitmap().is_some());
        assert!(slot.text_source().is_none());

        slot.text_source_mut().text = "back".to_string();
        assert!(slot.inline_bitmap().is_none());
        assert_eq!(slot.text_source().unwrap().text, "back");
        assert_eq!(slot.text_source().unwrap().font, DEFAULT_FONT);
        assert_eq!(slot.text_source().unwrap().offset, 0);

        slot.set_inline_bitmap(Bitmap::empty());
        slot.clear_inline_bitmap();
        assert_eq!(slot.source, BitmapSource::default());
    }
}
