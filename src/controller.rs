// src/controller.rs - Pin configuration engine and the digital/analog I/O surface
//!
//! [`PinController`] owns a board profile, a hardware backend and all the
//! resources configured through it. Configuration walks the board's mux
//! table for the requested mode in declared order; reads and writes go
//! through the handle retained at configuration time.
//!
//! ```rust
//! use wiring_rs::board::{BoardKind, Level, PinMode};
//! use wiring_rs::controller::PinController;
//! use wiring_rs::hardware::RecordingIo;
//! use wiring_rs::paths::SysfsLayout;
//!
//! let io = RecordingIo::new();
//! let board = BoardKind::GalileoGen2.profile();
//! let mut gpio = PinController::new(board, io, SysfsLayout::default()).unwrap();
//! gpio.configure(13, PinMode::Output).unwrap();
//! gpio.digital_write(13, Level::High).unwrap();
//! assert_eq!(gpio.digital_read(13).unwrap(), Level::High);
//! gpio.cleanup().unwrap();
//! ```

use crate::board::{BoardProfile, Level, MuxStep, MuxTarget, PIN_COUNT, PinMode, PwmInit};
use crate::config::Config;
use crate::error::GpioError;
use crate::hardware::{HardwareError, HardwareIo, IoHandle, SysfsIo};
use crate::mux;
use crate::paths::SysfsLayout;
use crate::pwm::{PeriodScope, PwmState};
use crate::tracker::ResourceTracker;
use std::collections::BTreeMap;

/// Token written to a line's `direction` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    /// Output, initially high.
    High,
    /// Output, initially low.
    Low,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::High => "high",
            Direction::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drive {
    Strong,
    HiZ,
}

impl Drive {
    pub fn as_str(self) -> &'static str {
        match self {
            Drive::Strong => "strong",
            Drive::HiZ => "hiz",
        }
    }
}

/// Snapshot of one configured logical pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinResourceState {
    pub mode: PinMode,
    pub has_handle: bool,
    pub exported: bool,
}

pub struct PinController<B: HardwareIo> {
    board: &'static dyn BoardProfile,
    io: B,
    layout: SysfsLayout,
    tracker: ResourceTracker<B::Handle>,
    modes: BTreeMap<u8, PinMode>,
    pwm: PwmState,
}

/// Controller over the real sysfs tree.
pub type Gpio = PinController<SysfsIo>;

impl Gpio {
    pub fn from_config(config: &Config) -> Result<Self, GpioError> {
        PinController::new(config.board.profile(), SysfsIo::new(), config.sysfs.clone())
    }
}

impl<B: HardwareIo> PinController<B> {
    /// Create a controller and bring the board to its startup state.
    ///
    /// On boards with a tristate line this exports it and enables the
    /// header; boards with a startup mode get every pin configured for it.
    pub fn new(
        board: &'static dyn BoardProfile,
        io: B,
        layout: SysfsLayout,
    ) -> Result<Self, GpioError> {
        let mut controller = Self {
            board,
            io,
            layout,
            tracker: ResourceTracker::new(),
            modes: BTreeMap::new(),
            pwm: PwmState::new(board),
        };
        tracing::info!(
            "Pin controller for {} ({:?} PWM period)",
            board.name(),
            board.period_model()
        );

        if let Some(line) = board.tristate_line() {
            controller.export_line(line)?;
            controller.set_direction(line, Direction::High)?;
        }
        if let Some(mode) = board.startup_mode() {
            for pin in 0..PIN_COUNT {
                controller.configure(pin, mode)?;
            }
        }
        Ok(controller)
    }

    pub fn board(&self) -> &'static dyn BoardProfile {
        self.board
    }

    pub fn layout(&self) -> &SysfsLayout {
        &self.layout
    }

    pub fn io(&self) -> &B {
        &self.io
    }

    pub fn tracker(&self) -> &ResourceTracker<B::Handle> {
        &self.tracker
    }

    pub fn pwm(&self) -> &PwmState {
        &self.pwm
    }

    pub fn pin_state(&self, pin: u8) -> Option<PinResourceState> {
        let mode = *self.modes.get(&pin)?;
        let line = self.board.line(pin)?;
        Some(PinResourceState {
            mode,
            has_handle: self.tracker.has_handle(line),
            exported: self.tracker.is_line_exported(line),
        })
    }

    fn line_of(&self, pin: u8) -> Result<u32, GpioError> {
        self.board.line(pin).ok_or(GpioError::UnknownPin {
            pin,
            board: self.board.name(),
        })
    }

    /// Route `pin` for `mode`.
    ///
    /// Unknown pins and unsupported modes are rejected before any control
    /// write. If the backend fails part-way the pin is left unconfigured;
    /// lines exported so far stay tracked for [`PinController::cleanup`].
    pub fn configure(&mut self, pin: u8, mode: PinMode) -> Result<(), GpioError> {
        let line = self.line_of(pin)?;
        let steps = mux::resolve(self.board, pin, mode)?;
        tracing::debug!(
            "Configuring pin {} (line {}) as {} with {} mux step(s)",
            pin,
            line,
            mode,
            steps.len()
        );

        match self.apply_configuration(pin, line, mode, steps) {
            Ok(()) => {
                self.modes.insert(pin, mode);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Configuring pin {} as {} failed: {}", pin, mode, e);
                self.modes.remove(&pin);
                self.tracker.release_handle(line);
                Err(e)
            }
        }
    }

    /// Boards with a tristate line get it driven LOW around the routing and
    /// always driven HIGH again, even when routing fails.
    fn apply_configuration(
        &mut self,
        pin: u8,
        line: u32,
        mode: PinMode,
        steps: &'static [MuxStep],
    ) -> Result<(), GpioError> {
        let Some(tristate) = self.board.tristate_line() else {
            return self.route_pin(pin, line, mode, steps);
        };
        self.export_line(tristate)?;
        self.set_direction(tristate, Direction::Low)?;

        let routed = self.route_pin(pin, line, mode, steps);
        let restored = self.set_direction(tristate, Direction::High);
        match (routed, restored) {
            (Ok(()), Ok(())) => Ok(()),
            (Ok(()), Err(restore)) => Err(restore.into()),
            (Err(cause), Ok(())) => Err(cause),
            (Err(cause), Err(restore)) => Err(GpioError::TristateRestore {
                cause: Box::new(cause),
                restore,
            }),
        }
    }

    fn route_pin(
        &mut self,
        pin: u8,
        line: u32,
        mode: PinMode,
        steps: &'static [MuxStep],
    ) -> Result<(), GpioError> {
        self.export_line(line)?;

        match mode {
            PinMode::AnalogInput => {
                let channel = self
                    .board
                    .adc_channel(pin)
                    .ok_or(GpioError::UnsupportedMode { pin, mode })?;
                let path = self.layout.adc_raw(self.board.adc_device(), channel);
                let handle = self.io.open(&path)?;
                self.tracker.retain_handle(line, handle);
            }
            PinMode::Pwm => {
                self.tracker.release_handle(line);
            }
            _ => {
                let handle = self.io.open(&self.layout.value(line))?;
                self.tracker.retain_handle(line, handle);
            }
        }

        for step in steps {
            self.apply_step(step)?;
        }

        match mode {
            PinMode::Output => {
                self.set_direction(line, Direction::Out)?;
                self.set_drive(line, Drive::Strong)?;
                self.write_level(line, Level::Low)?;
            }
            PinMode::Input | PinMode::InputPullup | PinMode::InputPulldown => {
                self.set_direction(line, Direction::In)?;
            }
            PinMode::Pwm => {
                let channel = self
                    .board
                    .pwm_channel(pin)
                    .ok_or(GpioError::UnsupportedMode { pin, mode })?;
                self.init_pwm(line, channel)?;
            }
            PinMode::AnalogInput => {}
        }
        Ok(())
    }

    fn apply_step(&mut self, step: &MuxStep) -> Result<(), GpioError> {
        let line = step.line;
        self.export_line(line)?;
        match step.target {
            MuxTarget::HiZ => {
                self.set_direction(line, Direction::In)?;
                self.set_drive(line, Drive::HiZ)?;
            }
            MuxTarget::High => {
                self.set_direction(line, Direction::High)?;
                self.set_drive(line, Drive::Strong)?;
                self.write_level(line, Level::High)?;
            }
            MuxTarget::Low => {
                self.set_direction(line, Direction::Low)?;
                self.set_drive(line, Drive::Strong)?;
                self.write_level(line, Level::Low)?;
            }
            MuxTarget::Function(function) => {
                self.io.write(&self.layout.pinmux(line), function.as_str())?;
            }
        }
        Ok(())
    }

    fn init_pwm(&mut self, line: u32, channel: u32) -> Result<(), GpioError> {
        match self.board.pwm_init() {
            PwmInit::DrivePrimaryHigh => {
                self.set_drive(line, Drive::Strong)?;
                self.set_direction(line, Direction::Out)?;
                self.write_level(line, Level::High)?;
                self.export_pwm(channel)?;
                self.pwm.set_enabled(channel, false);
                self.write_current_period(channel)?;
                self.write_duty_cycle(channel, 0)?;
            }
            PwmInit::SharedPeriodOnce => {
                self.export_pwm(channel)?;
                self.write_duty_cycle(channel, 0)?;
                self.pwm.set_enabled(channel, false);
                if !self.pwm.shared_period_written() {
                    self.write_current_period(channel)?;
                }
            }
            PwmInit::EnableImmediately => {
                self.export_pwm(channel)?;
                self.write_current_period(channel)?;
                self.write_duty_cycle(channel, 0)?;
                self.enable_pwm(channel)?;
            }
        }
        Ok(())
    }

    /// Drive an OUTPUT pin through its retained handle.
    pub fn digital_write(&mut self, pin: u8, level: Level) -> Result<(), GpioError> {
        let line = self.line_of(pin)?;
        self.require_mode(pin, |mode| mode == PinMode::Output)?;
        let handle = self.handle_for(pin, line)?;
        handle.write_value(level.as_value())?;
        Ok(())
    }

    /// Sample a digitally configured pin through its retained handle.
    pub fn digital_read(&mut self, pin: u8) -> Result<Level, GpioError> {
        let line = self.line_of(pin)?;
        self.require_mode(pin, PinMode::is_digital)?;
        let handle = self.handle_for(pin, line)?;
        let raw = handle.read_value()?;
        Level::from_value(&raw).ok_or_else(|| {
            GpioError::Hardware(HardwareError::Parse {
                path: handle.path().to_path_buf(),
                value: raw,
            })
        })
    }

    /// 10-bit sample (0..=1023) of an ANALOG_INPUT pin; the ADC reports 12 bits.
    pub fn analog_read(&mut self, pin: u8) -> Result<u16, GpioError> {
        let line = self.line_of(pin)?;
        self.require_mode(pin, |mode| mode == PinMode::AnalogInput)?;
        let handle = self.handle_for(pin, line)?;
        let raw = handle.read_value()?;
        let sample = raw.trim().parse::<u32>();
        match sample {
            Ok(sample) => Ok((sample >> 2).min(1023) as u16),
            Err(_) => Err(GpioError::Hardware(HardwareError::Parse {
                path: handle.path().to_path_buf(),
                value: raw,
            })),
        }
    }

    /// Set the duty cycle of a PWM pin; `value` is clamped to 0..=255.
    ///
    /// The channel is enabled on first use.
    pub fn analog_write(&mut self, pin: u8, value: i32) -> Result<(), GpioError> {
        let channel = self.pwm_channel_of(pin)?;
        self.require_mode(pin, |mode| mode == PinMode::Pwm)?;
        let value = value.clamp(0, 255) as u64;
        if !self.pwm.is_enabled(channel) {
            self.enable_pwm(channel)?;
        }
        let duty = self.pwm.duty_cycle(channel, value);
        self.write_duty_cycle(channel, duty)
    }

    /// Change the PWM period of `pin`, in nanoseconds.
    ///
    /// On shared-period boards this retimes every PWM output, including
    /// pins configured earlier; the returned scope says which happened.
    pub fn set_pwm_period(&mut self, pin: u8, period: u64) -> Result<PeriodScope, GpioError> {
        let channel = self.pwm_channel_of(pin)?;
        let bounds = self.board.period_bounds();
        if !bounds.contains(period) {
            return Err(GpioError::OutOfRangePeriod {
                period,
                min: bounds.min,
                max: bounds.max,
            });
        }
        let scope = self.pwm.set_period(&mut self.io, &self.layout, channel, period)?;
        if scope == PeriodScope::Board {
            tracing::warn!(
                "PWM period on {} is board-wide: all PWM outputs now run at {} ns",
                self.board.name(),
                period
            );
        }
        Ok(scope)
    }

    /// Period (ns) currently used for `pin`'s duty-cycle computation.
    pub fn pwm_period(&self, pin: u8) -> Result<u64, GpioError> {
        let channel = self.pwm_channel_of(pin)?;
        Ok(self.pwm.period(channel))
    }

    /// Close every handle and unexport every line and PWM channel.
    ///
    /// Every release is attempted; failures are collected into
    /// [`GpioError::Cleanup`]. Safe to call repeatedly.
    pub fn cleanup(&mut self) -> Result<(), GpioError> {
        let failures = self.tracker.release_all(&mut self.io, &self.layout);
        self.modes.clear();
        self.pwm.reset();
        if failures.is_empty() {
            Ok(())
        } else {
            for failure in &failures {
                tracing::warn!("Cleanup: {}", failure);
            }
            Err(GpioError::Cleanup(failures))
        }
    }

    /// Stop tracking everything configured so far without touching the
    /// hardware. Exported lines and PWM channels stay as they are, so the
    /// last levels written outlive the controller.
    pub fn detach(&mut self) {
        let (lines, channels) = self.tracker.forget_all();
        self.modes.clear();
        self.pwm.reset();
        tracing::info!(
            "Detached from {} line(s) and {} PWM channel(s); they remain exported",
            lines,
            channels
        );
    }

    fn pwm_channel_of(&self, pin: u8) -> Result<u32, GpioError> {
        self.line_of(pin)?;
        self.board.pwm_channel(pin).ok_or(GpioError::UnsupportedMode {
            pin,
            mode: PinMode::Pwm,
        })
    }

    fn require_mode(&self, pin: u8, accepts: impl Fn(PinMode) -> bool) -> Result<(), GpioError> {
        match self.modes.get(&pin) {
            Some(mode) if accepts(*mode) => Ok(()),
            current => Err(GpioError::UseBeforeConfigure {
                pin,
                current: current.copied(),
            }),
        }
    }

    fn handle_for(&mut self, pin: u8, line: u32) -> Result<&mut B::Handle, GpioError> {
        let current = self.modes.get(&pin).copied();
        self.tracker
            .handle_mut(line)
            .ok_or(GpioError::UseBeforeConfigure { pin, current })
    }

    fn export_line(&mut self, line: u32) -> Result<(), HardwareError> {
        if self.tracker.is_line_exported(line) {
            return Ok(());
        }
        self.io.write(&self.layout.export(), &line.to_string())?;
        self.tracker.track_line_export(line);
        Ok(())
    }

    fn export_pwm(&mut self, channel: u32) -> Result<(), HardwareError> {
        if !self.tracker.is_pwm_exported(channel) {
            self.io.write(&self.layout.pwm_export(), &channel.to_string())?;
            self.tracker.track_pwm_export(channel);
        }
        self.pwm.mark_exported(channel);
        Ok(())
    }

    fn set_direction(&mut self, line: u32, direction: Direction) -> Result<(), HardwareError> {
        let path = self.layout.direction(line);
        if !self.io.write_if_present(&path, direction.as_str())? {
            tracing::trace!("No direction control for line {}", line);
        }
        Ok(())
    }

    fn set_drive(&mut self, line: u32, drive: Drive) -> Result<(), HardwareError> {
        if self.board.has_drive_control() {
            self.io.write(&self.layout.drive(line), drive.as_str())?;
        }
        Ok(())
    }

    fn write_level(&mut self, line: u32, level: Level) -> Result<(), HardwareError> {
        self.io.write(&self.layout.value(line), level.as_value())
    }

    fn write_current_period(&mut self, channel: u32) -> Result<(), HardwareError> {
        let period = self.pwm.period(channel);
        self.pwm.set_period(&mut self.io, &self.layout, channel, period)?;
        Ok(())
    }

    fn write_duty_cycle(&mut self, channel: u32, duty: u64) -> Result<(), GpioError> {
        self.io.write(&self.layout.pwm_duty_cycle(channel), &duty.to_string())?;
        Ok(())
    }

    fn enable_pwm(&mut self, channel: u32) -> Result<(), HardwareError> {
        self.io.write(&self.layout.pwm_enable(channel), "1")?;
        self.pwm.set_enabled(channel, true);
        Ok(())
    }
}

impl<B: HardwareIo> Drop for PinController<B> {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            tracing::warn!("Releasing {} pins on drop: {}", self.board.name(), e);
        }
    }
}
