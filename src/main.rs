use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;

use lcd5110::demo::Scene;
use lcd5110::demo::rng::Rng;
use lcd5110::lcd::Framebuffer;
use lcd5110::sink::emulator::MAX_SCALE;
use lcd5110::sink::pcd8544::DEFAULT_VOP;
use lcd5110::sink::{self, Backend, DisplaySink, SinkConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Bouncing balls on a Nokia 5110 LCD or its emulator")]
struct Args {
    /// Where frames go
    #[arg(short, long, value_enum, default_value_t = Backend::Emulator)]
    backend: Backend,

    /// Number of balls
    #[arg(short = 'n', long, default_value_t = 8)]
    balls: usize,

    /// Sleep between frames, in milliseconds
    #[arg(long, default_value_t = 25)]
    frame_ms: u64,

    /// Emulator window pixels per LCD pixel
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
    scale: u32,

    /// RNG seed, taken from the clock when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Text scrolling through a band across the middle of the screen
    #[arg(long, default_value = "")]
    text: String,

    /// PCD8544 operating voltage setting (0..=127)
    #[arg(long, default_value_t = DEFAULT_VOP, value_parser = clap::value_parser!(u8).range(0..=127))]
    contrast: u8,

    /// Inverse video on the panel
    #[arg(long)]
    inverse: bool,

    /// Leave the backlight off
    #[arg(long)]
    no_backlight: bool,

    /// Stop after this many frames, 0 runs until closed
    #[arg(long, default_value_t = 0)]
    frames: u64,
}

fn run(args: &Args, display: &mut dyn DisplaySink) -> Result<(), String> {
    display.set_backlight(!args.no_backlight)?;

    let mut rng = args.seed.map(Rng::new).unwrap_or_else(Rng::from_time);
    let mut fb = Framebuffer::new();
    let mut scene =
        Scene::new(fb.width(), fb.height(), args.balls, &mut rng).with_ticker(&args.text);
    let pause = Duration::from_millis(args.frame_ms);

    let mut frame: u64 = 0;
    while args.frames == 0 || frame < args.frames {
        if display.poll_quit() {
            log::info!("quit requested after {} frames", frame);
            break;
        }

        scene.step();
        scene.render(&mut fb);
        display.present(&fb)?;

        frame += 1;
        thread::sleep(pause);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = SinkConfig {
        scale: args.scale,
        contrast: args.contrast,
        inverse: args.inverse,
        ..SinkConfig::default()
    };
    let mut display = sink::open(args.backend, &config);

    if let Err(e) = display.init() {
        log::error!("Error initializing LCD: {}", e);
        return ExitCode::FAILURE;
    }
    log::info!("{:?} backend up, {} balls", args.backend, args.balls);

    match run(&args, display.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
