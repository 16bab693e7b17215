use crate::lcd::{Color, Framebuffer};

/// A read-only image in the panel's own packing: strip rows of `width` bytes, each
/// byte a column of 8 pixels with bit 0 on top. `height` need not be a multiple of 8;
/// the unused bits of the last strip row are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, String> {
        let expected = width * height.div_ceil(8);
        if data.len() != expected {
            return Err(format!(
                "Bitmap {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            ));
        }
        Ok(Bitmap {
            width,
            height,
            data,
        })
    }

    /// For tables whose layout is known at compile time.
    pub(crate) fn new_unchecked(width: usize, height: usize, data: &'a [u8]) -> Self {
        debug_assert!(data.len() == width * height.div_ceil(8));
        Bitmap {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn strips(&self) -> usize {
        self.height.div_ceil(8)
    }

    /// Strip `strip` of column `x`, with rows past `height` masked off.
    /// Strips outside the image read as empty.
    fn strip(&self, x: usize, strip: i64) -> u8 {
        if strip < 0 || strip as usize >= self.strips() {
            return 0;
        }
        let strip = strip as usize;
        let byte = self.data[x + strip * self.width];
        let tail = self.height % 8;
        if strip + 1 == self.strips() && tail != 0 {
            byte & ((1u8 << tail) - 1)
        } else {
            byte
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.strip(x, (y / 8) as i64) & (1 << (y % 8)) != 0
    }
}

impl Framebuffer {
    /// Copies `bitmap` with its top-left corner at (`x`, `y`). Only [`Color::Or`] is
    /// implemented; any other mode leaves the buffer untouched.
    ///
    /// When `y` is not byte aligned each destination byte is built from the low bits
    /// of one source strip shifted down and the high bits of the strip above it.
    pub fn blit(&mut self, bitmap: &Bitmap, x: i32, y: i32, mode: Color) {
        if mode != Color::Or || bitmap.width == 0 || bitmap.height == 0 {
            return;
        }

        let y = y as i64;
        let bottom = y + bitmap.height as i64;
        if bottom <= 0 || y >= self.height() as i64 {
            return;
        }

        let shift = y.rem_euclid(8) as u32;
        let first_row = y.div_euclid(8);
        let dest_rows = (shift as i64 + bitmap.height as i64 + 7) / 8;
        let byte_rows = self.byte_rows() as i64;

        for sx in 0..bitmap.width {
            let dx = x as i64 + sx as i64;
            if dx < 0 || dx >= self.width() as i64 {
                continue;
            }

            for r in 0..dest_rows {
                let row = first_row + r;
                if row < 0 {
                    continue;
                }
                if row >= byte_rows {
                    break;
                }

                let lower = bitmap.strip(sx, r);
                let byte = if shift == 0 {
                    lower
                } else {
                    let upper = bitmap.strip(sx, r - 1);
                    (lower << shift) | (upper >> (8 - shift))
                };
                *self.byte_mut(dx as usize, row as usize) |= byte;
            }
        }
    }
}
