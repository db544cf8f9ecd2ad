use std::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};
use embedded_graphics::Pixel;

/// Row-major 1-bit-per-pixel canvas.
///
/// Each row is `stride = ceil(width / 8)` bytes, bit 7 of a byte being the
/// leftmost pixel. A set bit is a lit LED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoCanvas {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl MonoCanvas {
    /// An all-unlit canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Light or clear a pixel. Coordinates outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let index = y as usize * self.stride + x as usize / 8;
        let mask = 0x80u8 >> (x as usize % 8);
        if on {
            self.data[index] |= mask;
        } else {
            self.data[index] &= !mask;
        }
    }

    /// Whether a pixel is lit. Coordinates outside the canvas read as unlit.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y as usize * self.stride + x as usize / 8;
        self.data[index] & (0x80 >> (x % 8)) != 0
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl OriginDimensions for MonoCanvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for MonoCanvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::{Point, Primitive};
    use embedded_graphics::primitives::{Line, PrimitiveStyle};
    use embedded_graphics::Drawable;

    use super::*;

    #[test]
    fn test_stride_rounds_up() {
        assert_eq!(MonoCanvas::new(0, 11).stride(), 0);
        assert_eq!(MonoCanvas::new(1, 11).stride(), 1);
        assert_eq!(MonoCanvas::new(9, 11).stride(), 2);
        assert_eq!(MonoCanvas::new(16, 11).as_bytes().len(), 22);
    }

    #[test]
    fn test_set_pixel_msb_first_and_clipped() {
        let mut canvas = MonoCanvas::new(10, 2);
        canvas.set_pixel(0, 0, true);
        canvas.set_pixel(9, 1, true);
        canvas.set_pixel(-1, 0, true);
        canvas.set_pixel(10, 0, true);
        canvas.set_pixel(0, 2, true);

        assert_eq!(canvas.as_bytes(), &[0x80, 0x00, 0x00, 0x40]);
        assert!(canvas.pixel(9, 1));
        assert!(!canvas.pixel(10, 1));
        assert_eq!(canvas.lit_count(), 2);

        canvas.set_pixel(0, 0, false);
        assert!(!canvas.pixel(0, 0));
    }

    #[test]
    fn test_draw_target_accepts_primitives() {
        let mut canvas = MonoCanvas::new(8, 3);
        Line::new(Point::new(-4, 1), Point::new(20, 1))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(canvas.as_bytes(), &[0x00, 0xFF, 0x00]);
    }
}
