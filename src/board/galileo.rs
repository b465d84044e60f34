//! Intel Galileo (first generation).
//!
//! Mux lines are driven through the on-board GPIO expander. Each PWM
//! channel carries its own period register.

use super::{
    BoardProfile, ModeTable, PeriodBounds, PeriodModel, PinMode, PwmInit, hi, lo,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Galileo;

const LINES: &[(u8, u32)] = &[
    (0, 50), (1, 51), (2, 32), (3, 18), (4, 28),
    (5, 17), (6, 24), (7, 27), (8, 26), (9, 19),
    (10, 16), (11, 25), (12, 38), (13, 39), (14, 44),
    (15, 45), (16, 46), (17, 47), (18, 48), (19, 49),
];

const ADC: &[(u8, u32)] = &[(14, 0), (15, 1), (16, 2), (17, 3), (18, 4), (19, 5)];

const PWM: &[(u8, u32)] = &[(3, 3), (5, 5), (6, 6), (9, 1), (10, 7), (11, 4)];

// Shared by output and all input modes.
const DIGITAL: ModeTable = &[
    (0, &[hi(40)]),
    (1, &[hi(41)]),
    (2, &[hi(31)]),
    (3, &[hi(30)]),
    (4, &[]),
    (5, &[]),
    (6, &[]),
    (7, &[]),
    (8, &[]),
    (9, &[]),
    (10, &[hi(41)]),
    (11, &[hi(43)]),
    (12, &[hi(54)]),
    (13, &[hi(55)]),
    (14, &[hi(37)]),
    (15, &[hi(36)]),
    (16, &[hi(23)]),
    (17, &[hi(22)]),
    (18, &[hi(21), hi(29)]),
    (19, &[hi(20), hi(29)]),
];

const ANALOG_INPUT: ModeTable = &[
    (14, &[lo(37)]),
    (15, &[lo(36)]),
    (16, &[lo(23)]),
    (17, &[lo(22)]),
    (18, &[lo(21), hi(29)]),
    (19, &[lo(20), hi(29)]),
];

const PWM_MUX: ModeTable = &[
    (3, &[hi(30)]),
    (5, &[]),
    (6, &[]),
    (9, &[]),
    (10, &[hi(41)]),
    (11, &[hi(43)]),
];

impl BoardProfile for Galileo {
    fn name(&self) -> &'static str {
        "Galileo"
    }

    fn lines(&self) -> &'static [(u8, u32)] {
        LINES
    }

    fn adc_mapping(&self) -> &'static [(u8, u32)] {
        ADC
    }

    fn pwm_mapping(&self) -> &'static [(u8, u32)] {
        PWM
    }

    fn mode_table(&self, mode: PinMode) -> ModeTable {
        match mode {
            PinMode::Output | PinMode::Input | PinMode::InputPullup | PinMode::InputPulldown => {
                DIGITAL
            }
            PinMode::AnalogInput => ANALOG_INPUT,
            PinMode::Pwm => PWM_MUX,
        }
    }

    fn period_bounds(&self) -> PeriodBounds {
        PeriodBounds {
            min: 62_500,
            max: 7_999_999,
            default: 5_000_000,
        }
    }

    fn period_model(&self) -> PeriodModel {
        PeriodModel::PerChannel
    }

    fn pwm_init(&self) -> PwmInit {
        PwmInit::DrivePrimaryHigh
    }

    fn adc_device(&self) -> u32 {
        0
    }
}
