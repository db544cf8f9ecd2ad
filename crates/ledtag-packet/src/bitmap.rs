use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{PacketError, Result};

/// Number of LED rows on the device.
pub const HEIGHT: usize = 11;

/// Widest bitmap a single message may carry, in pixels.
pub const MAX_WIDTH_PX: usize = 4096;

/// Widest bitmap a single message may carry, in column groups.
pub const MAX_WIDTH_BYTES: usize = MAX_WIDTH_PX / 8;

/// A monochrome bitmap in the device's column-major layout.
///
/// The buffer holds [`HEIGHT`] bytes per 8-pixel column group: all rows of
/// group 0, then all rows of group 1, and so on. Bit 7 of each byte is the
/// leftmost pixel. The buffer length is always a multiple of [`HEIGHT`]; an
/// empty buffer is an absent bitmap.
///
/// Cloning is cheap and shares the underlying buffer, so a clone of an
/// inline bitmap is the same bitmap (see [`Bitmap::shares_buffer`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Bitmap {
    data: Bytes,
}

impl Bitmap {
    /// An absent bitmap.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an already column-major buffer.
    pub fn from_raw(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        if data.len() % HEIGHT != 0 {
            return Err(PacketError::RaggedBitmap {
                len: data.len(),
                height: HEIGHT,
            });
        }
        Ok(Self { data })
    }

    /// Convert a row-major 1-bpp canvas of `width_px` pixels.
    ///
    /// `rows` holds [`HEIGHT`] rows of `stride` bytes each, MSB first. The
    /// result has `ceil(width_px / 8)` column groups; groups past the end of
    /// the source stride are zero-filled and pixels past `width_px` in the
    /// last group are cleared. A width of zero yields an absent bitmap.
    pub fn from_row_major(rows: &[u8], stride: usize, width_px: usize) -> Self {
        let groups = width_px.div_ceil(8);
        if groups == 0 {
            return Self::empty();
        }

        let tail = width_px % 8;
        let mut data = Vec::with_capacity(groups * HEIGHT);
        for group in 0..groups {
            let mask = if group + 1 == groups && tail != 0 {
                0xFFu8 << (8 - tail)
            } else {
                0xFF
            };
            for row in 0..HEIGHT {
                let byte = if group < stride {
                    rows.get(row * stride + group).copied().unwrap_or(0)
                } else {
                    0
                };
                data.push(byte & mask);
            }
        }

        Self {
            data: Bytes::from(data),
        }
    }

    /// True when the bitmap has no column groups.
    pub fn is_absent(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of 8-pixel column groups.
    pub fn width_bytes(&self) -> usize {
        self.data.len() / HEIGHT
    }

    /// Width in pixels (always a multiple of 8).
    pub fn width_px(&self) -> usize {
        8 * self.width_bytes()
    }

    /// The raw column-major buffer as sent to the device.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The raw buffer as a shared handle.
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// True when both bitmaps are views of the same buffer.
    pub fn shares_buffer(&self, other: &Bitmap) -> bool {
        self.data.len() == other.data.len() && self.data.as_ptr() == other.data.as_ptr()
    }

    /// Lit pixels of column group `i` as `(column 0..8, row 0..HEIGHT)`.
    ///
    /// Rows are visited outer, columns inner. A group index past the end
    /// yields nothing. Calling this again restarts the sequence.
    pub fn byte_pixels(&self, i: usize) -> BytePixels<'_> {
        let rows = i
            .checked_mul(HEIGHT)
            .and_then(|start| Some(start..start.checked_add(HEIGHT)?))
            .and_then(|range| self.data.get(range))
            .unwrap_or(&[]);
        BytePixels {
            rows,
            row: 0,
            col: 0,
        }
    }

    /// Lit pixels of the whole bitmap as absolute `(x, y)` coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.width_bytes())
            .flat_map(move |i| self.byte_pixels(i).map(move |(col, row)| (8 * i + col, row)))
    }

    /// Whether the pixel at `(x, y)` is lit. Out-of-range pixels are unlit.
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        match self.data.get((x / 8) * HEIGHT + y) {
            Some(byte) => byte & (0x80 >> (x % 8)) != 0,
            None => false,
        }
    }

    /// Draw the bitmap as [`HEIGHT`] lines of text.
    pub fn render_ascii(&self, lit: char, unlit: char) -> String {
        let width = self.width_px();
        let mut out = String::with_capacity((width + 1) * HEIGHT);
        for y in 0..HEIGHT {
            for x in 0..width {
                out.push(if self.is_lit(x, y) { lit } else { unlit });
            }
            out.push('\n');
        }
        out
    }
}

impl TryFrom<Vec<u8>> for Bitmap {
    type Error = PacketError;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        Self::from_raw(value)
    }
}

impl From<Bitmap> for Vec<u8> {
    fn from(value: Bitmap) -> Self {
        value.data.to_vec()
    }
}

/// Iterator over the lit pixels of one column group.
#[derive(Debug, Clone)]
pub struct BytePixels<'a> {
    rows: &'a [u8],
    row: usize,
    col: usize,
}

impl Iterator for BytePixels<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&byte) = self.rows.get(self.row) {
            while self.col < 8 {
                let col = self.col;
                self.col += 1;
                if byte & (0x80 >> col) != 0 {
                    return Some((col, self.row));
                }
            }
            self.col = 0;
            self.row += 1;
        }
        None
    }
}
