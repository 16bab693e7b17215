pub mod blit;
pub mod font;
pub mod line;
pub mod shape;

/// How a drawing primitive combines with what is already in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
    Xor,
    /// Set-if-source-set. Only meaningful for [`Framebuffer::blit`]; pixel and run
    /// primitives treat it like `Black`.
    Or,
}

impl Color {
    /// Applies this combine mode to `byte` for the bits selected by `mask`.
    #[inline]
    pub(crate) fn apply(self, byte: &mut u8, mask: u8) {
        match self {
            Color::White => *byte &= !mask,
            Color::Black | Color::Or => *byte |= mask,
            Color::Xor => *byte ^= mask,
        }
    }
}

/// Monochrome framebuffer, packed the way the PCD8544 expects it: each byte is a
/// column of 8 vertically adjacent pixels, bit 0 on top, and byte rows of `width`
/// bytes follow each other top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Framebuffer {
    pub const WIDTH: usize = 84;
    pub const HEIGHT: usize = 48;

    pub fn new() -> Self {
        Framebuffer {
            width: Framebuffer::WIDTH,
            height: Framebuffer::HEIGHT,
            data: vec![0; Framebuffer::WIDTH * Framebuffer::HEIGHT / 8],
        }
    }

    pub fn with_size(width: usize, height: usize) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid framebuffer size {}x{}", width, height));
        }
        if height % 8 != 0 {
            return Err(format!(
                "Framebuffer height must be a multiple of 8, got {}",
                height
            ));
        }

        Ok(Framebuffer {
            width,
            height,
            data: vec![0; width * height / 8],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw packed bytes in panel transmission order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn byte_rows(&self) -> usize {
        self.height / 8
    }

    pub(crate) fn in_x(&self, x: i32) -> bool {
        x >= 0 && (x as usize) < self.width
    }

    pub(crate) fn in_y(&self, y: i32) -> bool {
        y >= 0 && (y as usize) < self.height
    }

    /// Byte holding column `x` of byte row `row`. Both must be in range.
    #[inline]
    pub(crate) fn byte_mut(&mut self, x: usize, row: usize) -> &mut u8 {
        &mut self.data[x + row * self.width]
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn invert(&mut self) {
        for byte in self.data.iter_mut() {
            *byte ^= 0xFF;
        }
    }

    /// Writes a single pixel. Coordinates outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_x(x) || !self.in_y(y) {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        color.apply(self.byte_mut(x, y / 8), 1 << (y % 8));
    }

    /// Returns whether the pixel is set. Anything outside the buffer reads as clear.
    pub fn get_pixel(&self, x: i32, y: i32) -> bool {
        if !self.in_x(x) || !self.in_y(y) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        self.data[x + (y / 8) * self.width] & (1 << (y % 8)) != 0
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Framebuffer {}x{}", self.width, self.height)?;
        for y in 0..self.height as i32 {
            let row: String = (0..self.width as i32)
                .map(|x| if self.get_pixel(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    /// Every set pixel, in row-major order.
    pub fn lit_pixels(fb: &Framebuffer) -> Vec<(i32, i32)> {
        let mut lit = Vec::new();
        for y in 0..fb.height() as i32 {
            for x in 0..fb.width() as i32 {
                if fb.get_pixel(x, y) {
                    lit.push((x, y));
                }
            }
        }
        lit
    }

    /// Deterministic noise so tests start from a non-trivial buffer.
    pub fn noisy() -> Framebuffer {
        let mut fb = Framebuffer::new();
        let mut state: u32 = 0x1234_5678;
        for byte in fb.data.iter_mut() {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            *byte = state as u8;
        }
        fb
    }

    #[test]
    fn test_new_is_blank() {
        let fb = Framebuffer::new();
        assert_eq!(fb.as_bytes().len(), 84 * 48 / 8);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_with_size_rejects_unpacked_height() {
        assert!(Framebuffer::with_size(16, 12).is_err());
        assert!(Framebuffer::with_size(0, 8).is_err());
        let fb = Framebuffer::with_size(16, 24).unwrap();
        assert_eq!(fb.as_bytes().len(), 48);
    }

    #[test]
    fn test_pixel_packing() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(3, 10, Color::Black);
        assert_eq!(fb.as_bytes()[3 + 84], 0b0000_0100);

        fb.set_pixel(83, 47, Color::Black);
        assert_eq!(fb.as_bytes()[83 + 5 * 84], 0b1000_0000);
    }

    #[test]
    fn test_set_get_every_pixel() {
        let mut fb = noisy();
        for y in 0..48 {
            for x in 0..84 {
                fb.set_pixel(x, y, Color::Black);
                assert!(fb.get_pixel(x, y));
                fb.set_pixel(x, y, Color::White);
                assert!(!fb.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_xor_is_involution() {
        let mut fb = noisy();
        let before = fb.clone();
        for y in 0..48 {
            for x in 0..84 {
                let was = fb.get_pixel(x, y);
                fb.set_pixel(x, y, Color::Xor);
                assert_ne!(fb.get_pixel(x, y), was);
                fb.set_pixel(x, y, Color::Xor);
            }
        }
        assert_eq!(fb, before);
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut fb = noisy();
        let before = fb.clone();
        for &(x, y) in &[
            (-1, 0),
            (0, -1),
            (84, 0),
            (0, 48),
            (84, 47),
            (-100, -100),
            (i32::MAX, 3),
            (3, i32::MIN),
        ] {
            fb.set_pixel(x, y, Color::Black);
            fb.set_pixel(x, y, Color::White);
            fb.set_pixel(x, y, Color::Xor);
            assert!(!fb.get_pixel(x, y));
        }
        assert_eq!(fb, before);
    }

    #[test]
    fn test_clear() {
        let mut fb = noisy();
        fb.clear();
        assert!(lit_pixels(&fb).is_empty());
    }

    #[test]
    fn test_invert_twice_restores() {
        let mut fb = noisy();
        let before = fb.clone();
        fb.invert();
        assert!(fb.as_bytes().iter().zip(before.as_bytes()).all(|(a, b)| a ^ b == 0xFF));
        fb.invert();
        assert_eq!(fb, before);
    }

    #[test]
    fn test_or_sets_like_black() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(5, 5, Color::Or);
        fb.set_pixel(5, 5, Color::Or);
        assert!(fb.get_pixel(5, 5));
    }
}
