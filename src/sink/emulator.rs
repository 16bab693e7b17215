use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color as SdlColor;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::lcd::Framebuffer;
use crate::sink::DisplaySink;

const TITLE: &str = "Nokia 5110 LCD";
/// Largest pixel scale; keeps window sizes and rect offsets well inside `i32`.
pub const MAX_SCALE: u32 = 64;
const PAPER: SdlColor = SdlColor::RGB(255, 255, 255);
const INK: SdlColor = SdlColor::RGB(0, 0, 0);

struct Screen {
    canvas: Canvas<Window>,
    events: EventPump,
    // keeps SDL alive until the canvas and pump are gone
    _sdl: sdl2::Sdl,
}

/// Draws frames into an SDL2 window, each LCD pixel a `scale` x `scale` square.
pub struct EmulatorSink {
    scale: u32,
    screen: Option<Screen>,
    size: (u32, u32),
}

impl EmulatorSink {
    pub fn new(scale: u32) -> Self {
        EmulatorSink {
            scale: scale.clamp(1, MAX_SCALE),
            screen: None,
            size: (Framebuffer::WIDTH as u32, Framebuffer::HEIGHT as u32),
        }
    }

    /// Pixel squares to fill for `frame`.
    fn ink_rects(&self, frame: &Framebuffer) -> Vec<Rect> {
        let mut rects = Vec::new();
        for y in 0..frame.height() as i32 {
            for x in 0..frame.width() as i32 {
                if frame.get_pixel(x, y) {
                    rects.push(Rect::new(
                        x * self.scale as i32,
                        y * self.scale as i32,
                        self.scale,
                        self.scale,
                    ));
                }
            }
        }
        rects
    }
}

impl DisplaySink for EmulatorSink {
    fn init(&mut self) -> Result<(), String> {
        let sdl = sdl2::init().map_err(|e| format!("SDL_Init Error: {}", e))?;
        let video = sdl
            .video()
            .map_err(|e| format!("SDL video Error: {}", e))?;

        let window = video
            .window(TITLE, self.size.0 * self.scale, self.size.1 * self.scale)
            .position_centered()
            .build()
            .map_err(|e| format!("SDL_CreateWindow Error: {}", e))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| format!("SDL_CreateRenderer Error: {}", e))?;

        let events = sdl.event_pump()?;

        self.screen = Some(Screen {
            canvas,
            events,
            _sdl: sdl,
        });
        log::info!(
            "emulator window {}x{} (scale {})",
            self.size.0 * self.scale,
            self.size.1 * self.scale,
            self.scale
        );
        Ok(())
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<(), String> {
        if (frame.width() as u32, frame.height() as u32) != self.size {
            self.size = (frame.width() as u32, frame.height() as u32);
            if let Some(screen) = self.screen.as_mut() {
                screen
                    .canvas
                    .window_mut()
                    .set_size(self.size.0 * self.scale, self.size.1 * self.scale)
                    .map_err(|e| format!("Failed to resize window: {}", e))?;
            }
        }

        let rects = self.ink_rects(frame);
        let screen = self
            .screen
            .as_mut()
            .ok_or_else(|| "Emulator used before init".to_string())?;

        screen.canvas.set_draw_color(PAPER);
        screen.canvas.clear();
        screen.canvas.set_draw_color(INK);
        if !rects.is_empty() {
            screen.canvas.fill_rects(&rects)?;
        }
        screen.canvas.present();

        log::trace!("presented {} lit pixels", rects.len());
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), String> {
        log::info!("backlight state: {}", on as u8);
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        let Some(screen) = self.screen.as_mut() else {
            return false;
        };

        let mut quit = false;
        for event in screen.events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => quit = true,
                _ => {}
            }
        }
        quit
    }
}

impl Drop for EmulatorSink {
    fn drop(&mut self) {
        if self.screen.take().is_some() {
            log::info!("emulator window closed");
        }
    }
}
