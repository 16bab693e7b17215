pub mod ball;
pub mod rng;
pub mod ticker;

use crate::lcd::Framebuffer;
use ball::Ball;
use rng::Rng;
use ticker::Ticker;

/// Bouncing balls plus an optional ticker, advanced and drawn once per frame.
pub struct Scene {
    width: i32,
    height: i32,
    pub balls: Vec<Ball>,
    pub ticker: Option<Ticker>,
}

impl Scene {
    pub fn new(width: usize, height: usize, ball_count: usize, rng: &mut Rng) -> Self {
        let (width, height) = (width as i32, height as i32);
        let balls = (0..ball_count)
            .map(|_| Ball::random(rng, width, height))
            .collect();

        Scene {
            width,
            height,
            balls,
            ticker: None,
        }
    }

    pub fn with_ticker(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.ticker = Some(Ticker::new(text));
        }
        self
    }

    pub fn step(&mut self) {
        for ball in self.balls.iter_mut() {
            ball.update(self.width, self.height);
        }
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.step();
        }
    }

    /// Redraws the whole frame from scratch.
    pub fn render(&self, fb: &mut Framebuffer) {
        fb.clear();
        for ball in &self.balls {
            ball.draw(fb);
        }
        if let Some(ticker) = &self.ticker {
            ticker.draw(fb);
        }
    }
}
