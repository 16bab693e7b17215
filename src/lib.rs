pub mod demo;
pub mod lcd;
pub mod sink;

pub use lcd::{Color, Framebuffer};
