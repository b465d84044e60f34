// src/error.rs - Error taxonomy for pin configuration and I/O
use crate::board::PinMode;
use crate::hardware::HardwareError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpioError {
    #[error("pin {pin} is not mapped on {board}")]
    UnknownPin { pin: u8, board: &'static str },
    #[error("pin {pin} does not support mode {mode}")]
    UnsupportedMode { pin: u8, mode: PinMode },
    #[error("hardware I/O failure: {0}")]
    Hardware(#[from] HardwareError),
    #[error("PWM period {period} ns outside [{min}, {max}]")]
    OutOfRangePeriod { period: u64, min: u64, max: u64 },
    #[error(
        "pin {pin} is not configured for this operation (current mode: {})",
        display_mode(.current)
    )]
    UseBeforeConfigure { pin: u8, current: Option<PinMode> },
    #[error("cleanup left {} resource(s) unreleased", .0.len())]
    Cleanup(Vec<HardwareError>),
    #[error("{cause}; re-enabling the header also failed: {restore}")]
    TristateRestore {
        cause: Box<GpioError>,
        #[source]
        restore: HardwareError,
    },
}

fn display_mode(mode: &Option<PinMode>) -> String {
    match mode {
        Some(mode) => mode.to_string(),
        None => "unconfigured".to_string(),
    }
}

impl GpioError {
    /// True for the conditions that abort before any control path is touched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GpioError::UnknownPin { .. }
                | GpioError::UnsupportedMode { .. }
                | GpioError::OutOfRangePeriod { .. }
                | GpioError::UseBeforeConfigure { .. }
        )
    }
}
