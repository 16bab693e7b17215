use crate::demo::rng::Rng;
use crate::lcd::{Color, Framebuffer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ball {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    pub r: i32,
}

impl Ball {
    /// A ball of radius 4..=11 placed fully inside a `width` x `height` screen, moving
    /// 1 or 2 pixels per frame on each axis.
    pub fn random(rng: &mut Rng, width: i32, height: i32) -> Self {
        let vx = rng.sign() * (rng.below(2) + 1);
        let vy = rng.sign() * (rng.below(2) + 1);
        let r = (rng.below(8) + 4).min((width.min(height) - 1) / 2).max(0);
        let x = Ball::place(rng, width, r);
        let y = Ball::place(rng, height, r);
        Ball { x, y, vx, vy, r }
    }

    fn place(rng: &mut Rng, extent: i32, r: i32) -> i32 {
        let room = extent - 2 * r;
        if room > 0 {
            rng.below(room) + r
        } else {
            extent / 2
        }
    }

    /// Moves one frame and bounces off the edges.
    pub fn update(&mut self, width: i32, height: i32) {
        self.x += self.vx;
        self.y += self.vy;
        if self.x - self.r < 0 || self.x + self.r >= width {
            self.vx = -self.vx;
            self.x += 2 * self.vx;
        }
        if self.y - self.r < 0 || self.y + self.r >= height {
            self.vy = -self.vy;
            self.y += 2 * self.vy;
        }
    }

    /// Erases the disc, then draws a ring with a solid core.
    pub fn draw(&self, fb: &mut Framebuffer) {
        fb.fill_circle(self.x, self.y, self.r, Color::White);
        fb.draw_circle(self.x, self.y, self.r, Color::Black);
        fb.fill_circle(self.x, self.y, self.r - 2, Color::Black);
    }
}
