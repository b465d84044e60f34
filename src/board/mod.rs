// src/board/mod.rs - Board profile trait, shared pin enumerations and board selection
//! # Board profiles
//!
//! Each supported board is a data-only type implementing [`BoardProfile`]:
//! the logical-to-physical line mapping, ADC and PWM channel mappings, the
//! ordered mux tables per [`PinMode`], and the PWM period model.
//!
//! ## Example
//!
//! ```rust
//! use wiring_rs::board::{BoardKind, PinMode};
//! let board = BoardKind::GalileoGen2.profile();
//! assert_eq!(board.line(13), Some(7));
//! assert!(board.mux_table(PinMode::Pwm, 3).is_some());
//! ```

pub mod edison;
pub mod galileo;
pub mod galileo_gen2;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use edison::Edison;
pub use galileo::Galileo;
pub use galileo_gen2::GalileoGen2;

/// Number of logical pins exposed on the Arduino-style header.
pub const PIN_COUNT: u8 = 20;

/// Electrical mode requested for a logical pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinMode {
    Output,
    Input,
    InputPullup,
    InputPulldown,
    AnalogInput,
    Pwm,
}

impl PinMode {
    pub const ALL: [PinMode; 6] = [
        PinMode::Output,
        PinMode::Input,
        PinMode::InputPullup,
        PinMode::InputPulldown,
        PinMode::AnalogInput,
        PinMode::Pwm,
    ];

    /// Modes served by a retained value handle on the primary line.
    pub fn is_digital(self) -> bool {
        matches!(
            self,
            PinMode::Output | PinMode::Input | PinMode::InputPullup | PinMode::InputPulldown
        )
    }

    pub fn is_input(self) -> bool {
        matches!(
            self,
            PinMode::Input | PinMode::InputPullup | PinMode::InputPulldown
        )
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PinMode::Output => "output",
            PinMode::Input => "input",
            PinMode::InputPullup => "input_pullup",
            PinMode::InputPulldown => "input_pulldown",
            PinMode::AnalogInput => "analog_input",
            PinMode::Pwm => "pwm",
        };
        f.write_str(name)
    }
}

/// Digital level of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Token written to a `value` control file.
    pub fn as_value(self) -> &'static str {
        match self {
            Level::Low => "0",
            Level::High => "1",
        }
    }

    /// Interpret the text read back from a `value` control file.
    pub fn from_value(raw: &str) -> Option<Level> {
        match raw.trim().parse::<i64>() {
            Ok(0) => Some(Level::Low),
            Ok(_) => Some(Level::High),
            Err(_) => None,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        match level {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

/// Alternate-function selector for boards with a pinmux register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
    Mode4,
    Mode5,
}

impl FunctionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FunctionMode::Mode0 => "mode0",
            FunctionMode::Mode1 => "mode1",
            FunctionMode::Mode2 => "mode2",
            FunctionMode::Mode3 => "mode3",
            FunctionMode::Mode4 => "mode4",
            FunctionMode::Mode5 => "mode5",
        }
    }
}

/// Level a mux step drives its line to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MuxTarget {
    High,
    Low,
    /// Input direction with high-impedance drive.
    HiZ,
    Function(FunctionMode),
}

/// One `(line, target)` assertion in a mux table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuxStep {
    pub line: u32,
    pub target: MuxTarget,
}

/// Ordered steps; later steps may rely on earlier ones.
pub type MuxTable = &'static [MuxStep];

pub(crate) const fn hi(line: u32) -> MuxStep {
    MuxStep { line, target: MuxTarget::High }
}

pub(crate) const fn lo(line: u32) -> MuxStep {
    MuxStep { line, target: MuxTarget::Low }
}

pub(crate) const fn hiz(line: u32) -> MuxStep {
    MuxStep { line, target: MuxTarget::HiZ }
}

pub(crate) const fn func(line: u32, mode: FunctionMode) -> MuxStep {
    MuxStep { line, target: MuxTarget::Function(mode) }
}

/// Per-pin table entries for one mode.
pub type ModeTable = &'static [(u8, MuxTable)];

pub(crate) fn lookup<T: Copy>(table: &[(u8, T)], pin: u8) -> Option<T> {
    table.iter().find(|(p, _)| *p == pin).map(|(_, v)| *v)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodBounds {
    pub min: u64,
    pub max: u64,
    pub default: u64,
}

impl PeriodBounds {
    pub fn contains(&self, period: u64) -> bool {
        (self.min..=self.max).contains(&period)
    }
}

/// How PWM channels own their period register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodModel {
    PerChannel,
    /// One register for every channel; writing it glitches all enabled outputs.
    Shared,
}

/// PWM channel bring-up sequence used by `configure(pin, Pwm)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PwmInit {
    /// Primary line driven strong/out/HIGH, channel exported, period then duty 0, left disabled.
    DrivePrimaryHigh,
    /// Channel exported, duty 0, left disabled, shared period written once.
    SharedPeriodOnce,
    /// Channel exported, period then duty 0, enabled immediately.
    EnableImmediately,
}

/// Static description of one board.
pub trait BoardProfile: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Logical pin to native GPIO line.
    fn lines(&self) -> &'static [(u8, u32)];

    fn adc_mapping(&self) -> &'static [(u8, u32)];

    fn pwm_mapping(&self) -> &'static [(u8, u32)];

    fn mode_table(&self, mode: PinMode) -> ModeTable;

    fn period_bounds(&self) -> PeriodBounds;

    fn period_model(&self) -> PeriodModel;

    fn pwm_init(&self) -> PwmInit;

    /// IIO device index of the ADC.
    fn adc_device(&self) -> u32;

    /// Output-enable line gating the whole header, if the board has one.
    fn tristate_line(&self) -> Option<u32> {
        None
    }

    /// Boards with a tristate line select pulls through the pinmux instead.
    fn has_drive_control(&self) -> bool {
        self.tristate_line().is_none()
    }

    /// Mode every pin is put in when a controller is created.
    fn startup_mode(&self) -> Option<PinMode> {
        None
    }

    fn line(&self, pin: u8) -> Option<u32> {
        lookup(self.lines(), pin)
    }

    fn adc_channel(&self, pin: u8) -> Option<u32> {
        lookup(self.adc_mapping(), pin)
    }

    fn pwm_channel(&self, pin: u8) -> Option<u32> {
        lookup(self.pwm_mapping(), pin)
    }

    fn mux_table(&self, mode: PinMode, pin: u8) -> Option<MuxTable> {
        lookup(self.mode_table(mode), pin)
    }
}

/// Board selector used by configuration and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BoardKind {
    Galileo,
    #[default]
    GalileoGen2,
    Edison,
}

impl BoardKind {
    pub fn profile(self) -> &'static dyn BoardProfile {
        match self {
            BoardKind::Galileo => &Galileo,
            BoardKind::GalileoGen2 => &GalileoGen2,
            BoardKind::Edison => &Edison,
        }
    }
}
