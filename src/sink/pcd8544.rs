use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use bitflags::bitflags;

use crate::lcd::Framebuffer;
use crate::sink::DisplaySink;

pub const DEFAULT_VOP: u8 = 0x30;
const TEMP_COEFFICIENT: u8 = 0;
const BIAS: u8 = 4; // 1:48 mux rate

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FunctionSet: u8 {
        const POWER_DOWN = 0b100;
        const VERTICAL_ADDRESSING = 0b010;
        const EXTENDED = 0b001;
    }
}

bitflags! {
    /// Mode bits of the display control command. `DISPLAY_ON` alone is normal
    /// mode, both bits give inverse video, `INVERT` alone lights every segment and
    /// neither blanks the panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DisplayControl: u8 {
        const DISPLAY_ON = 0b100;
        const INVERT = 0b001;
    }
}

impl DisplayControl {
    pub const NORMAL: DisplayControl = DisplayControl::DISPLAY_ON;
    pub const INVERSE: DisplayControl = DisplayControl::DISPLAY_ON.union(DisplayControl::INVERT);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FunctionSet(FunctionSet),
    DisplayControl(DisplayControl),
    SetY(u8),
    SetX(u8),
    // extended instruction set
    TemperatureCoefficient(u8),
    Bias(u8),
    Vop(u8),
}

impl Command {
    pub fn byte(self) -> u8 {
        match self {
            Command::FunctionSet(flags) => 0x20 | flags.bits(),
            Command::DisplayControl(flags) => 0x08 | flags.bits(),
            Command::SetY(y) => 0x40 | (y & 0x07),
            Command::SetX(x) => 0x80 | (x & 0x7F),
            Command::TemperatureCoefficient(tc) => 0x04 | (tc & 0x03),
            Command::Bias(bias) => 0x10 | (bias & 0x07),
            Command::Vop(vop) => 0x80 | (vop & 0x7F),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    /// Chip enable, active low
    Sce,
    /// Active low
    Reset,
    /// Low for commands, high for display data
    Dc,
    Din,
    Clk,
    Light,
}

impl Pin {
    pub const ALL: [Pin; 6] = [Pin::Sce, Pin::Reset, Pin::Dc, Pin::Din, Pin::Clk, Pin::Light];
}

/// The digital outputs wired to the panel.
pub trait Pins {
    fn setup(&mut self) -> Result<(), String>;
    fn write(&mut self, pin: Pin, high: bool) -> Result<(), String>;
}

/// PCD8544 (Nokia 5110) driven by bit-banged serial.
pub struct Pcd8544<P: Pins> {
    pins: P,
    vop: u8,
    inverse: bool,
    ready: bool,
}

impl<P: Pins> Pcd8544<P> {
    pub fn new(pins: P) -> Self {
        Pcd8544 {
            pins,
            vop: DEFAULT_VOP,
            inverse: false,
            ready: false,
        }
    }

    pub fn with_contrast(mut self, vop: u8) -> Self {
        self.vop = vop & 0x7F;
        self
    }

    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    fn shift_out(&mut self, byte: u8) -> Result<(), String> {
        for bit in (0..8).rev() {
            self.pins.write(Pin::Din, byte & (1 << bit) != 0)?;
            self.pins.write(Pin::Clk, true)?;
            self.pins.write(Pin::Clk, false)?;
        }
        Ok(())
    }

    fn send_commands(&mut self, commands: &[Command]) -> Result<(), String> {
        self.pins.write(Pin::Dc, false)?;
        for command in commands {
            self.shift_out(command.byte())?;
        }
        Ok(())
    }
}

impl<P: Pins> DisplaySink for Pcd8544<P> {
    fn init(&mut self) -> Result<(), String> {
        self.pins.setup()?;

        self.pins.write(Pin::Reset, false)?;
        self.pins.write(Pin::Reset, true)?;

        let display = if self.inverse {
            DisplayControl::INVERSE
        } else {
            DisplayControl::NORMAL
        };

        self.pins.write(Pin::Sce, false)?;
        self.send_commands(&[
            Command::FunctionSet(FunctionSet::EXTENDED),
            Command::Vop(self.vop),
            Command::TemperatureCoefficient(TEMP_COEFFICIENT),
            Command::Bias(BIAS),
            Command::FunctionSet(FunctionSet::empty()),
            Command::DisplayControl(display),
        ])?;
        self.pins.write(Pin::Sce, true)?;

        self.ready = true;
        log::info!("PCD8544 ready (vop {:#04x}, inverse {})", self.vop, self.inverse);
        Ok(())
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<(), String> {
        if !self.ready {
            return Err("PCD8544 used before init".to_string());
        }
        if frame.width() != Framebuffer::WIDTH || frame.height() != Framebuffer::HEIGHT {
            return Err(format!(
                "PCD8544 is {}x{}, frame is {}x{}",
                Framebuffer::WIDTH,
                Framebuffer::HEIGHT,
                frame.width(),
                frame.height()
            ));
        }

        self.pins.write(Pin::Sce, false)?;
        self.send_commands(&[Command::SetY(0), Command::SetX(0)])?;
        self.pins.write(Pin::Dc, true)?;
        for &byte in frame.as_bytes() {
            self.shift_out(byte)?;
        }
        self.pins.write(Pin::Sce, true)?;

        log::trace!("sent {} bytes to PCD8544", frame.as_bytes().len());
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), String> {
        self.pins.write(Pin::Light, on)
    }
}

/// BCM GPIO numbers for each panel line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinMap {
    pub sce: u32,
    pub reset: u32,
    pub dc: u32,
    pub din: u32,
    pub clk: u32,
    pub light: u32,
}

impl PinMap {
    pub fn gpio(&self, pin: Pin) -> u32 {
        match pin {
            Pin::Sce => self.sce,
            Pin::Reset => self.reset,
            Pin::Dc => self.dc,
            Pin::Din => self.din,
            Pin::Clk => self.clk,
            Pin::Light => self.light,
        }
    }
}

impl Default for PinMap {
    fn default() -> Self {
        PinMap {
            sce: 8,
            reset: 24,
            dc: 23,
            din: 10,
            clk: 11,
            light: 17,
        }
    }
}

/// Pins driven through the Linux sysfs GPIO interface.
pub struct SysfsPins {
    root: PathBuf,
    map: PinMap,
    values: HashMap<Pin, File>,
}

impl SysfsPins {
    pub fn new(map: PinMap) -> Self {
        SysfsPins::with_root("/sys/class/gpio", map)
    }

    pub fn with_root<R: Into<PathBuf>>(root: R, map: PinMap) -> Self {
        SysfsPins {
            root: root.into(),
            map,
            values: HashMap::new(),
        }
    }

    fn export(&self, gpio: u32) -> Result<PathBuf, String> {
        let dir = self.root.join(format!("gpio{}", gpio));
        if !dir.exists() {
            fs::write(self.root.join("export"), gpio.to_string())
                .map_err(|e| format!("Failed to export GPIO {}: {}", gpio, e))?;
        }
        fs::write(dir.join("direction"), "out")
            .map_err(|e| format!("Failed to set GPIO {} as output: {}", gpio, e))?;
        Ok(dir)
    }
}

impl Pins for SysfsPins {
    fn setup(&mut self) -> Result<(), String> {
        for pin in Pin::ALL {
            let gpio = self.map.gpio(pin);
            let dir = self.export(gpio)?;
            let value = OpenOptions::new()
                .write(true)
                .open(dir.join("value"))
                .map_err(|e| format!("Failed to open GPIO {} value: {}", gpio, e))?;
            log::debug!("{:?} on GPIO {}", pin, gpio);
            self.values.insert(pin, value);
        }
        Ok(())
    }

    fn write(&mut self, pin: Pin, high: bool) -> Result<(), String> {
        let file = self
            .values
            .get_mut(&pin)
            .ok_or_else(|| format!("GPIO for {:?} is not set up", pin))?;
        file.seek(SeekFrom::Start(0))
            .and_then(|_| file.write_all(if high { b"1" } else { b"0" }))
            .map_err(|e| format!("Failed to write {:?}: {}", pin, e))
    }
}
