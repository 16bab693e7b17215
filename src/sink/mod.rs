pub mod emulator;
pub mod pcd8544;

use crate::lcd::Framebuffer;
use emulator::EmulatorSink;
use pcd8544::{Pcd8544, PinMap, SysfsPins};

/// Something that shows a finished frame.
pub trait DisplaySink {
    fn init(&mut self) -> Result<(), String>;

    /// Sends or draws the whole buffer. Called once per frame after all drawing is done.
    fn present(&mut self, frame: &Framebuffer) -> Result<(), String>;

    fn set_backlight(&mut self, on: bool) -> Result<(), String>;

    /// Non-blocking check for a request to stop, e.g. the window being closed.
    fn poll_quit(&mut self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// SDL2 window on the host
    Emulator,
    /// PCD8544 panel on Linux GPIO
    Hardware,
}

#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub scale: u32,
    pub contrast: u8,
    pub inverse: bool,
    pub pins: PinMap,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            scale: 8,
            contrast: pcd8544::DEFAULT_VOP,
            inverse: false,
            pins: PinMap::default(),
        }
    }
}

/// Picks the sink for `backend`. Nothing touches the device until `init`.
pub fn open(backend: Backend, config: &SinkConfig) -> Box<dyn DisplaySink> {
    match backend {
        Backend::Emulator => Box::new(EmulatorSink::new(config.scale)),
        Backend::Hardware => Box::new(
            Pcd8544::new(SysfsPins::new(config.pins.clone()))
                .with_contrast(config.contrast)
                .with_inverse(config.inverse),
        ),
    }
}
