// src/main.rs - Board inspection and demo programs
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use wiring_rs::board::{BoardProfile, PIN_COUNT, PeriodBounds, PeriodModel};
use wiring_rs::config::{self, Config};
use wiring_rs::hardware::{HardwareIo, IoOp};
use wiring_rs::{BoardKind, Level, PinController, PinMode, RecordingIo, SysfsIo, SysfsLayout, mux};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Parser)]
#[command(name = "wiring", version, about = "Arduino-style pin I/O for Galileo and Edison boards")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Board to drive; overrides the configuration file
    #[arg(short, long, value_enum)]
    board: Option<BoardKind>,
    /// Log control operations instead of touching sysfs
    #[arg(long)]
    dry_run: bool,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print the board's pin mapping and supported modes
    Pins {
        #[arg(long)]
        json: bool,
    },
    /// Toggle one output pin
    Blink {
        #[arg(long, default_value_t = 13)]
        pin: u8,
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Toggle every header pin
    BlinkAll {
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Ramp a PWM pin's duty cycle up and down
    Fade {
        #[arg(long, default_value_t = 3)]
        pin: u8,
        #[arg(long, default_value_t = 5)]
        step: i32,
        #[arg(long, default_value_t = 30)]
        delay_ms: u64,
        /// PWM period in nanoseconds
        #[arg(long)]
        period: Option<u64>,
    },
    /// Mirror a button input onto an LED
    Button {
        #[arg(long, default_value_t = 2)]
        button: u8,
        #[arg(long, default_value_t = 13)]
        led: u8,
    },
    /// Blink an LED at a rate set by an analog input
    Analog {
        #[arg(long, default_value_t = 14)]
        pin: u8,
        #[arg(long, default_value_t = 13)]
        led: u8,
    },
    /// Configure a pin as an input and print one sample
    Read {
        #[arg(long)]
        pin: u8,
        #[arg(long, value_enum, default_value = "input")]
        mode: ReadMode,
    },
    /// Configure a pin as an output and leave it driven; `reset` releases it
    Write {
        #[arg(long)]
        pin: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
        level: u8,
    },
    /// Unexport every line and PWM channel the board's tables use
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReadMode {
    Input,
    Pullup,
    Pulldown,
    Analog,
}

impl From<ReadMode> for PinMode {
    fn from(mode: ReadMode) -> Self {
        match mode {
            ReadMode::Input => PinMode::Input,
            ReadMode::Pullup => PinMode::InputPullup,
            ReadMode::Pulldown => PinMode::InputPulldown,
            ReadMode::Analog => PinMode::AnalogInput,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    if let Some(board) = cli.board {
        config.board = board;
    }
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()?
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let board = config.board.profile();
    tracing::info!("Starting wiring-rs on {}", board.name());

    match cli.command {
        Command::Pins { json } => print_pins(board, json),
        Command::Reset if cli.dry_run => {
            let io = RecordingIo::new();
            reset(board, &mut io.clone(), &config.sysfs);
            print_ops(&io);
            Ok(())
        }
        Command::Reset => {
            reset(board, &mut SysfsIo::new(), &config.sysfs);
            Ok(())
        }
        command if cli.dry_run => {
            let io = RecordingIo::new();
            let result = match PinController::new(board, io.clone(), config.sysfs.clone()) {
                Ok(gpio) => run(gpio, command).await,
                Err(e) => Err(e.into()),
            };
            print_ops(&io);
            result
        }
        command => {
            let gpio = PinController::new(board, SysfsIo::new(), config.sysfs.clone())?;
            run(gpio, command).await
        }
    }
}

/// Run a demo until it finishes or Ctrl-C arrives, then park its outputs and clean up.
///
/// A successful `write` keeps its pin exported so the level outlives the process.
async fn run<B: HardwareIo>(
    mut gpio: PinController<B>,
    command: Command,
) -> Result<(), BoxError> {
    let outcome = tokio::select! {
        result = demo(&mut gpio, &command) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, cleaning up");
            Ok(())
        }
    };
    if let (Command::Write { pin, .. }, Ok(())) = (&command, &outcome) {
        gpio.detach();
        tracing::info!("Pin {} left driven; run `wiring reset` to release it", pin);
        return Ok(());
    }
    park_outputs(&mut gpio, &command);
    gpio.cleanup()?;
    outcome
}

async fn demo<B: HardwareIo>(
    gpio: &mut PinController<B>,
    command: &Command,
) -> Result<(), BoxError> {
    match *command {
        Command::Blink { pin, interval_ms, count } => {
            gpio.configure(pin, PinMode::Output)?;
            let mut level = Level::High;
            for _ in cycles(count) {
                gpio.digital_write(pin, level)?;
                level = toggle(level);
                sleep(Duration::from_millis(interval_ms)).await;
            }
        }
        Command::BlinkAll { interval_ms, count } => {
            for pin in 0..PIN_COUNT {
                gpio.configure(pin, PinMode::Output)?;
            }
            let mut level = Level::High;
            for _ in cycles(count) {
                for pin in 0..PIN_COUNT {
                    gpio.digital_write(pin, level)?;
                }
                level = toggle(level);
                sleep(Duration::from_millis(interval_ms)).await;
            }
        }
        Command::Fade { pin, step, delay_ms, period } => {
            gpio.configure(pin, PinMode::Pwm)?;
            if let Some(period) = period {
                let scope = gpio.set_pwm_period(pin, period)?;
                tracing::info!("PWM period set to {} ns ({:?} scope)", period, scope);
            }
            let mut brightness: i32 = 0;
            let mut step = step.max(1);
            loop {
                gpio.analog_write(pin, brightness)?;
                brightness = (brightness + step).clamp(0, 255);
                if brightness == 0 || brightness == 255 {
                    step = -step;
                }
                sleep(Duration::from_millis(delay_ms)).await;
            }
        }
        Command::Button { button, led } => {
            gpio.configure(led, PinMode::Output)?;
            gpio.configure(button, PinMode::Input)?;
            loop {
                let level = gpio.digital_read(button)?;
                gpio.digital_write(led, level)?;
                sleep(Duration::from_millis(10)).await;
            }
        }
        Command::Analog { pin, led } => {
            gpio.configure(pin, PinMode::AnalogInput)?;
            gpio.configure(led, PinMode::Output)?;
            loop {
                let value = gpio.analog_read(pin)?;
                let half_period = Duration::from_millis(u64::from(value) * 1000 / 1023)
                    .max(Duration::from_millis(1));
                gpio.digital_write(led, Level::High)?;
                sleep(half_period).await;
                gpio.digital_write(led, Level::Low)?;
                sleep(half_period).await;
            }
        }
        Command::Read { pin, mode } => {
            let mode = PinMode::from(mode);
            gpio.configure(pin, mode)?;
            if mode.is_input() {
                println!("pin {}: {}", pin, u8::from(gpio.digital_read(pin)?));
            } else {
                println!("pin {}: {}", pin, gpio.analog_read(pin)?);
            }
        }
        Command::Write { pin, level } => {
            gpio.configure(pin, PinMode::Output)?;
            gpio.digital_write(pin, Level::from(level == 1))?;
        }
        Command::Pins { .. } | Command::Reset => {}
    }
    Ok(())
}

fn park_outputs<B: HardwareIo>(gpio: &mut PinController<B>, command: &Command) {
    let parked = match *command {
        Command::Blink { pin, .. } => gpio.digital_write(pin, Level::Low),
        Command::BlinkAll { .. } => {
            (0..PIN_COUNT).try_for_each(|pin| gpio.digital_write(pin, Level::Low))
        }
        Command::Fade { pin, .. } => gpio.analog_write(pin, 0),
        Command::Button { led, .. } | Command::Analog { led, .. } => {
            gpio.digital_write(led, Level::Low)
        }
        _ => Ok(()),
    };
    if let Err(e) = parked {
        tracing::debug!("Could not park outputs: {}", e);
    }
}

fn cycles(count: Option<u32>) -> impl Iterator<Item = u32> {
    (0..).take_while(move |i| count.is_none_or(|c| *i < c))
}

fn toggle(level: Level) -> Level {
    match level {
        Level::High => Level::Low,
        Level::Low => Level::High,
    }
}

/// Best-effort unexport of everything a previous run may have left behind.
fn reset<B: HardwareIo>(board: &dyn BoardProfile, io: &mut B, layout: &SysfsLayout) {
    let mut released = 0;
    for line in mux::referenced_lines(board) {
        if io.write(&layout.unexport(), &line.to_string()).is_ok() {
            released += 1;
        }
    }
    for (_, channel) in board.pwm_mapping() {
        if io.write(&layout.pwm_unexport(), &channel.to_string()).is_ok() {
            released += 1;
        }
    }
    tracing::info!("Reset {}: {} resource(s) unexported", board.name(), released);
}

fn print_ops(io: &RecordingIo) {
    for op in io.ops() {
        match op {
            IoOp::Write { path, value } => println!("echo {} > {}", value, path.display()),
            IoOp::Open { path } => println!("open {}", path.display()),
            IoOp::HandleWrite { path, value } => println!("write {} > {}", value, path.display()),
            IoOp::HandleRead { path } => println!("read {}", path.display()),
        }
    }
}

#[derive(Debug, Serialize)]
struct BoardReport {
    name: &'static str,
    period_model: PeriodModel,
    period_bounds: PeriodBounds,
    tristate_line: Option<u32>,
    pins: Vec<PinReport>,
}

#[derive(Debug, Serialize)]
struct PinReport {
    pin: u8,
    line: Option<u32>,
    adc_channel: Option<u32>,
    pwm_channel: Option<u32>,
    modes: Vec<PinMode>,
}

fn print_pins(board: &dyn BoardProfile, json: bool) -> Result<(), BoxError> {
    let report = BoardReport {
        name: board.name(),
        period_model: board.period_model(),
        period_bounds: board.period_bounds(),
        tristate_line: board.tristate_line(),
        pins: (0..PIN_COUNT)
            .map(|pin| PinReport {
                pin,
                line: board.line(pin),
                adc_channel: board.adc_channel(pin),
                pwm_channel: board.pwm_channel(pin),
                modes: mux::supported_modes(board, pin),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} ({:?} PWM period, {}-{} ns)",
        report.name, report.period_model, report.period_bounds.min, report.period_bounds.max
    );
    println!("{:>3}  {:>5}  {:>3}  {:>3}  modes", "pin", "line", "adc", "pwm");
    for pin in &report.pins {
        let show = |v: Option<u32>| v.map_or("-".to_string(), |v| v.to_string());
        let modes: Vec<String> = pin.modes.iter().map(|m| m.to_string()).collect();
        println!(
            "{:>3}  {:>5}  {:>3}  {:>3}  {}",
            pin.pin,
            show(pin.line),
            show(pin.adc_channel),
            show(pin.pwm_channel),
            modes.join(", ")
        );
    }
    Ok(())
}
