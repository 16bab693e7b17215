use crate::lcd::font::{GLYPH_HEIGHT, text_width};
use crate::lcd::{Color, Framebuffer};

/// A line of text scrolling right to left through a framed band across the middle
/// of the screen. Copies of the text follow each other back to back, so the loop
/// has no gap.
#[derive(Debug, Clone)]
pub struct Ticker {
    text: String,
    offset: i32,
}

impl Ticker {
    pub fn new(text: impl Into<String>) -> Self {
        Ticker {
            text: text.into(),
            offset: 0,
        }
    }

    /// Left edge of the first copy, always in `-(period - 1)..=0`.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Width of one copy of the text.
    pub fn period(&self) -> i32 {
        text_width(&self.text) as i32
    }

    pub fn step(&mut self) {
        let period = self.period();
        if period > 0 {
            self.offset = (self.offset - 1) % period;
        }
    }

    pub fn draw(&self, fb: &mut Framebuffer) {
        let width = fb.width() as i32;
        let glyph = GLYPH_HEIGHT as i32;
        let top = (fb.height() as i32 - glyph) / 2;

        fb.fill_rect(0, top - 2, width - 1, top + glyph + 1, Color::Black);
        fb.fill_rect(0, top - 1, width - 1, top + glyph, Color::White);

        let period = self.period();
        if period == 0 {
            return;
        }
        let mut pen = self.offset;
        while pen < width {
            fb.draw_text(&self.text, pen, top);
            pen += period;
        }
    }
}
