//! Intel Galileo Gen2.
//!
//! Pin routing goes through level shifters, pull-up/down resistor lines and
//! mux selectors on several GPIO expanders, so most tables touch three to five
//! lines. All PWM channels share one period register on the PCA9685.

use super::{
    BoardProfile, ModeTable, PeriodBounds, PeriodModel, PinMode, PwmInit, hi, hiz, lo,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct GalileoGen2;

const LINES: &[(u8, u32)] = &[
    (0, 11), (1, 12), (2, 61), (3, 62), (4, 6),
    (5, 0), (6, 1), (7, 38), (8, 40), (9, 4),
    (10, 10), (11, 5), (12, 15), (13, 7), (14, 48),
    (15, 50), (16, 52), (17, 54), (18, 56), (19, 58),
];

const ADC: &[(u8, u32)] = &[(14, 0), (15, 1), (16, 2), (17, 3), (18, 4), (19, 5)];

const PWM: &[(u8, u32)] = &[(3, 1), (5, 3), (6, 5), (9, 7), (10, 11), (11, 9)];

const OUTPUT: ModeTable = &[
    (0, &[lo(32), hiz(33)]),
    (1, &[lo(45), lo(28), hiz(29)]),
    (2, &[lo(77), lo(34), hiz(35), hiz(13)]),
    (3, &[lo(64), lo(76), lo(16), hiz(17), hiz(14)]),
    (4, &[lo(36), hiz(37)]),
    (5, &[lo(66), lo(18), hiz(19)]),
    (6, &[lo(68), lo(20), hiz(21)]),
    (7, &[hiz(39)]),
    (8, &[hiz(41)]),
    (9, &[lo(70), lo(22), hiz(23)]),
    (10, &[lo(74), lo(26), hiz(27)]),
    (11, &[lo(44), lo(72), lo(24), hiz(25)]),
    (12, &[lo(42), hiz(43)]),
    (13, &[lo(46), lo(30), hiz(31)]),
    (14, &[hiz(49)]),
    (15, &[hiz(51)]),
    (16, &[hiz(53)]),
    (17, &[hiz(55)]),
    (18, &[hi(78), hi(60), hiz(57)]),
    (19, &[hi(79), hi(60), hiz(59)]),
];

const INPUT: ModeTable = &[
    (0, &[hi(32), hiz(33)]),
    (1, &[lo(45), hi(28), hiz(29)]),
    (2, &[lo(77), hi(34), hiz(35), hiz(13)]),
    (3, &[lo(64), lo(76), hi(16), hiz(17), hiz(14)]),
    (4, &[hi(36), hiz(37)]),
    (5, &[lo(66), hi(18), hiz(19)]),
    (6, &[lo(68), hi(20), hiz(21)]),
    (7, &[hiz(39)]),
    (8, &[hiz(41)]),
    (9, &[lo(70), hi(22), hiz(23)]),
    (10, &[lo(74), hi(26), hiz(27)]),
    (11, &[lo(44), lo(72), hi(24), hiz(25)]),
    (12, &[hi(42), hiz(43)]),
    (13, &[lo(46), hi(30), hiz(31)]),
    (14, &[hiz(49)]),
    (15, &[hiz(51)]),
    (16, &[hiz(53)]),
    (17, &[hiz(55)]),
    (18, &[hi(78), hi(60), hiz(57)]),
    (19, &[hi(79), hi(60), hiz(59)]),
];

const INPUT_PULLUP: ModeTable = &[
    (0, &[hi(32), hi(33)]),
    (1, &[lo(45), hi(28), hi(29)]),
    (2, &[lo(77), hi(34), hi(35), hiz(13)]),
    (3, &[lo(64), lo(76), hi(16), hi(17), hiz(14)]),
    (4, &[hi(36), hi(37)]),
    (5, &[lo(66), hi(18), hi(19)]),
    (6, &[lo(68), hi(20), hi(21)]),
    (7, &[hi(39)]),
    (8, &[hi(41)]),
    (9, &[lo(70), hi(22), hi(23)]),
    (10, &[lo(74), hi(26), hi(27)]),
    (11, &[lo(44), lo(72), hi(24), hi(25)]),
    (12, &[hi(42), hi(43)]),
    (13, &[lo(46), hi(30), hi(31)]),
    (14, &[hi(49)]),
    (15, &[hi(51)]),
    (16, &[hi(53)]),
    (17, &[hi(55)]),
    (18, &[hi(78), hi(60), hi(57)]),
    (19, &[hi(79), hi(60), hi(59)]),
];

const INPUT_PULLDOWN: ModeTable = &[
    (0, &[hi(32)]),
    (1, &[lo(45), hi(28), lo(29)]),
    (2, &[lo(77), hi(34), lo(35), hiz(13)]),
    (3, &[lo(64), lo(76), hi(16), lo(17), hiz(14)]),
    (4, &[hi(36), lo(37)]),
    (5, &[lo(66), hi(18), lo(19)]),
    (6, &[lo(68), hi(20), lo(21)]),
    (7, &[lo(39)]),
    (8, &[lo(41)]),
    (9, &[lo(70), hi(22), lo(23)]),
    (10, &[lo(74), hi(26), lo(27)]),
    (11, &[lo(44), lo(72), hi(24), lo(25)]),
    (12, &[hi(42), lo(43)]),
    (13, &[lo(46), hi(30), lo(31)]),
    (14, &[lo(49)]),
    (15, &[lo(51)]),
    (16, &[lo(53)]),
    (17, &[lo(55)]),
    (18, &[hi(78), hi(60), lo(57)]),
    (19, &[hi(79), hi(60), lo(59)]),
];

const ANALOG_INPUT: ModeTable = &[
    (14, &[hiz(48), hiz(49)]),
    (15, &[hiz(50), hiz(51)]),
    (16, &[hiz(52), hiz(53)]),
    (17, &[hiz(54), hiz(55)]),
    (18, &[lo(78), hi(60), hiz(56), hiz(57)]),
    (19, &[lo(79), hi(60), hiz(58), hiz(59)]),
];

const PWM_MUX: ModeTable = &[
    (3, &[hi(64), lo(76), lo(16), hiz(17), hiz(62)]),
    (5, &[hi(66), lo(18), hiz(19)]),
    (6, &[hi(68), lo(20), hiz(21)]),
    (9, &[hi(70), lo(22), hiz(23)]),
    (10, &[hi(74), lo(26), hiz(27)]),
    (11, &[hi(72), lo(24), hiz(25)]),
];

impl BoardProfile for GalileoGen2 {
    fn name(&self) -> &'static str {
        "Galileo Gen2"
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
            PinMode::Output => OUTPUT,
            PinMode::Input => INPUT,
            PinMode::InputPullup => INPUT_PULLUP,
            PinMode::InputPulldown => INPUT_PULLDOWN,
            PinMode::AnalogInput => ANALOG_INPUT,
            PinMode::Pwm => PWM_MUX,
        }
    }

    fn period_bounds(&self) -> PeriodBounds {
        PeriodBounds {
            min: 666_666,
            max: 41_666_666,
            default: 5_000_000,
        }
    }

    fn period_model(&self) -> PeriodModel {
        PeriodModel::Shared
    }

    fn pwm_init(&self) -> PwmInit {
        PwmInit::SharedPeriodOnce
    }

    fn adc_device(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MuxTarget;

    #[test]
    fn test_pin_13_output_routes_through_level_shifter() {
        let table = GalileoGen2.mux_table(PinMode::Output, 13).unwrap();
        let lines: Vec<u32> = table.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![46, 30, 31]);
        assert_eq!(table[2].target, MuxTarget::HiZ);
    }

    #[test]
    fn test_pulldown_pin_0_has_no_resistor_step() {
        let table = GalileoGen2.mux_table(PinMode::InputPulldown, 0).unwrap();
        assert_eq!(table.len(), 1);
    }
}
