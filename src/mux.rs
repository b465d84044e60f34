// src/mux.rs - Mux table resolution for a (board, pin, mode) request
use crate::board::{BoardProfile, MuxTable, PinMode};
use crate::error::GpioError;
use std::collections::BTreeSet;

/// Ordered mux steps that route `pin` for `mode` on `board`.
///
/// Fails with [`GpioError::UnknownPin`] when the pin is not on the header and
/// with [`GpioError::UnsupportedMode`] when the board has no table for the
/// pair, or the pin lacks the ADC/PWM channel the mode needs. Pure lookup.
pub fn resolve(board: &dyn BoardProfile, pin: u8, mode: PinMode) -> Result<MuxTable, GpioError> {
    if board.line(pin).is_none() {
        return Err(GpioError::UnknownPin {
            pin,
            board: board.name(),
        });
    }
    let has_channel = match mode {
        PinMode::AnalogInput => board.adc_channel(pin).is_some(),
        PinMode::Pwm => board.pwm_channel(pin).is_some(),
        _ => true,
    };
    let unsupported = GpioError::UnsupportedMode { pin, mode };
    if !has_channel {
        return Err(unsupported);
    }
    board.mux_table(mode, pin).ok_or(unsupported)
}

pub fn supported_modes(board: &dyn BoardProfile, pin: u8) -> Vec<PinMode> {
    PinMode::ALL
        .into_iter()
        .filter(|mode| resolve(board, pin, *mode).is_ok())
        .collect()
}

/// Every native line a board's tables can export, including the tristate line.
pub fn referenced_lines(board: &dyn BoardProfile) -> BTreeSet<u32> {
    let mut lines: BTreeSet<u32> = board.lines().iter().map(|(_, line)| *line).collect();
    for mode in PinMode::ALL {
        for (_, table) in board.mode_table(mode) {
            lines.extend(table.iter().map(|step| step.line));
        }
    }
    lines.extend(board.tristate_line());
    lines
}
