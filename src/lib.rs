//! # wiring-rs
//!
//! Arduino-style pin I/O for Intel Galileo, Galileo Gen2 and Edison boards.
//!
//! Logical header pins 0-19 are routed to the board's native GPIO lines by
//! walking per-board mux tables, after which pins can be driven and sampled
//! through the Linux sysfs GPIO, PWM and IIO interfaces.
//!
//! - [`board`]: static per-board tables and the [`board::BoardProfile`] trait
//! - [`mux`]: resolution of a (pin, mode) request to an ordered mux table
//! - [`controller`]: [`controller::PinController`], the public operation surface
//! - [`tracker`]: exported lines, PWM channels and open handles
//! - [`hardware`]: the control-file backend contract and its implementations

pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod hardware;
pub mod mux;
pub mod paths;
pub mod pwm;
pub mod tracker;

pub use board::{BoardKind, BoardProfile, Level, PinMode};
pub use controller::{Gpio, PinController, PinResourceState};
pub use error::GpioError;
pub use hardware::{HardwareError, HardwareIo, RecordingIo, SysfsIo};
pub use paths::SysfsLayout;
pub use pwm::PeriodScope;
