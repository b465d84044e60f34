//! Intel Edison on the Arduino expansion board.
//!
//! Every header pin sits behind a shared output-enable line (214) which must
//! be held LOW while routing changes. Alternate functions are selected via the
//! debugfs pinmux file instead of drive-strength files.

use super::FunctionMode::{Mode0, Mode1};
use super::{
    BoardProfile, ModeTable, PeriodBounds, PeriodModel, PinMode, PwmInit, func, hi, hiz, lo,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Edison;

const TRISTATE_LINE: u32 = 214;

const LINES: &[(u8, u32)] = &[
    (0, 130), (1, 131), (2, 128), (3, 12), (4, 129),
    (5, 13), (6, 182), (7, 48), (8, 49), (9, 183),
    (10, 41), (11, 43), (12, 42), (13, 40), (14, 44),
    (15, 45), (16, 46), (17, 47), (18, 14), (19, 165),
];

const ADC: &[(u8, u32)] = &[(14, 0), (15, 1), (16, 2), (17, 3), (18, 4), (19, 5)];

// Pins 10 and 11 need the SPI swizzler for PWM, which is not wired up.
const PWM: &[(u8, u32)] = &[(3, 0), (5, 1), (6, 2), (9, 3)];

const OUTPUT: ModeTable = &[
    (0, &[func(130, Mode0), hi(248), hi(216)]),
    (1, &[func(131, Mode0), hi(249), hi(217)]),
    (2, &[func(128, Mode0), hi(250), hi(218)]),
    (3, &[func(12, Mode0), hi(251), hi(219)]),
    (4, &[func(129, Mode0), hi(252), hi(220)]),
    (5, &[func(13, Mode0), hi(253), hi(221)]),
    (6, &[func(182, Mode0), hi(254), hi(222)]),
    (7, &[func(48, Mode0), hi(255), hi(223)]),
    (8, &[func(49, Mode0), hi(256), hi(224)]),
    (9, &[func(183, Mode0), hi(257), hi(225)]),
    (10, &[func(41, Mode0), hi(258), hi(226), lo(240), hi(263)]),
    (11, &[func(43, Mode0), hi(259), hi(227), lo(241), hi(262)]),
    (12, &[func(42, Mode0), hi(260), hi(228), lo(242)]),
    (13, &[func(40, Mode0), hi(261), hi(229), lo(243)]),
    (14, &[func(44, Mode0), hi(232), hi(208), lo(200)]),
    (15, &[func(45, Mode0), hi(233), hi(209), lo(201)]),
    (16, &[func(46, Mode0), hi(234), hi(210), lo(202)]),
    (17, &[func(47, Mode0), hi(235), hi(211), lo(203)]),
    (18, &[func(14, Mode0), hi(236), hi(212), lo(204)]),
    (19, &[func(165, Mode0), hi(237), hi(213), lo(205)]),
];

const INPUT: ModeTable = &[
    (0, &[func(130, Mode0), lo(248), hiz(216)]),
    (1, &[func(131, Mode0), lo(249), hiz(217)]),
    (2, &[func(128, Mode0), lo(250), hiz(218)]),
    (3, &[func(12, Mode0), lo(251), hiz(219)]),
    (4, &[func(129, Mode0), lo(252), hiz(220)]),
    (5, &[func(13, Mode0), lo(253), hiz(221)]),
    (6, &[func(182, Mode0), lo(254), hiz(222)]),
    (7, &[func(48, Mode0), lo(255), hiz(223)]),
    (8, &[func(49, Mode0), lo(256), hiz(224)]),
    (9, &[func(183, Mode0), lo(257), hiz(225)]),
    (10, &[func(41, Mode0), lo(258), hiz(226), lo(240), hi(263)]),
    (11, &[func(43, Mode0), lo(259), hiz(227), lo(241), hi(262)]),
    (12, &[func(42, Mode0), lo(260), hiz(228), lo(242)]),
    (13, &[func(40, Mode0), lo(261), hiz(229), lo(243)]),
    (14, &[func(44, Mode0), lo(232), hiz(208), lo(200)]),
    (15, &[func(45, Mode0), lo(233), hiz(209), lo(201)]),
    (16, &[func(46, Mode0), lo(234), hiz(210), lo(202)]),
    (17, &[func(47, Mode0), lo(235), hiz(211), lo(203)]),
    (18, &[func(14, Mode0), lo(236), hiz(212), lo(204)]),
    (19, &[func(165, Mode0), lo(237), hiz(213), lo(205)]),
];

const INPUT_PULLUP: ModeTable = &[
    (0, &[func(130, Mode0), lo(248), hi(216)]),
    (1, &[func(131, Mode0), lo(249), hi(217)]),
    (2, &[func(128, Mode0), lo(250), hi(218)]),
    (3, &[func(12, Mode0), lo(251), hi(219)]),
    (4, &[func(129, Mode0), lo(252), hi(220)]),
    (5, &[func(13, Mode0), lo(253), hi(221)]),
    (6, &[func(182, Mode0), lo(254), hi(222)]),
    (7, &[func(48, Mode0), lo(255), hi(223)]),
    (8, &[func(49, Mode0), lo(256), hi(224)]),
    (9, &[func(183, Mode0), lo(257), hi(225)]),
    (10, &[func(41, Mode0), lo(258), hi(226), lo(240), hi(263)]),
    (11, &[func(43, Mode0), lo(259), hi(227), lo(241), hi(262)]),
    (12, &[func(42, Mode0), lo(260), hi(228), lo(242)]),
    (13, &[func(40, Mode0), lo(261), hi(229), lo(243)]),
    (14, &[func(44, Mode0), lo(232), hi(208), lo(200)]),
    (15, &[func(45, Mode0), lo(233), hi(209), lo(201)]),
    (16, &[func(46, Mode0), lo(234), hi(210), lo(202)]),
    (17, &[func(47, Mode0), lo(235), hi(211), lo(203)]),
    (18, &[func(14, Mode0), lo(236), hi(212), lo(204)]),
    (19, &[func(165, Mode0), lo(237), hi(213), lo(205)]),
];

const INPUT_PULLDOWN: ModeTable = &[
    (0, &[func(130, Mode0), lo(248), lo(216)]),
    (1, &[func(131, Mode0), lo(249), lo(217)]),
    (2, &[func(128, Mode0), lo(250), lo(218)]),
    (3, &[func(12, Mode0), lo(251), lo(219)]),
    (4, &[func(129, Mode0), lo(252), lo(220)]),
    (5, &[func(13, Mode0), lo(253), lo(221)]),
    (6, &[func(182, Mode0), lo(254), lo(222)]),
    (7, &[func(48, Mode0), lo(255), lo(223)]),
    (8, &[func(49, Mode0), lo(256), lo(224)]),
    (9, &[func(183, Mode0), lo(257), lo(225)]),
    (10, &[func(41, Mode0), lo(258), lo(226), lo(240), hi(263)]),
    (11, &[func(43, Mode0), lo(259), lo(227), lo(241), hi(262)]),
    (12, &[func(42, Mode0), lo(260), lo(228), lo(242)]),
    (13, &[func(40, Mode0), lo(261), lo(229), lo(243)]),
    (14, &[func(44, Mode0), lo(232), lo(208), lo(200)]),
    (15, &[func(45, Mode0), lo(233), lo(209), lo(201)]),
    (16, &[func(46, Mode0), lo(234), lo(210), lo(202)]),
    (17, &[func(47, Mode0), lo(235), lo(211), lo(203)]),
    (18, &[func(14, Mode0), lo(236), lo(212), lo(204)]),
    (19, &[func(165, Mode0), lo(237), lo(213), lo(205)]),
];

const ANALOG_INPUT: ModeTable = &[
    (14, &[func(44, Mode0), hi(200), lo(232), hiz(208)]),
    (15, &[func(45, Mode0), hi(201), lo(233), hiz(209)]),
    (16, &[func(46, Mode0), hi(202), lo(234), hiz(210)]),
    (17, &[func(47, Mode0), hi(203), lo(235), hiz(211)]),
    (18, &[func(14, Mode0), hi(204), lo(236), hiz(212)]),
    (19, &[func(165, Mode0), hi(205), lo(237), hiz(213)]),
];

const PWM_MUX: ModeTable = &[
    (3, &[func(12, Mode1), hi(251), hiz(219)]),
    (5, &[func(13, Mode1), hi(253), hiz(221)]),
    (6, &[func(182, Mode1), hi(254), hiz(222)]),
    (9, &[func(183, Mode1), hi(257), hiz(225)]),
    (10, &[func(41, Mode1), hi(258), hiz(226), lo(240), hi(263)]),
    (11, &[func(43, Mode1), hi(259), hiz(227), lo(241), hi(262)]),
];

impl BoardProfile for Edison {
    fn name(&self) -> &'static str {
        "Edison"
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
            min: 104,
            max: 218_453_000,
            default: 2_048_000,
        }
    }

    fn period_model(&self) -> PeriodModel {
        PeriodModel::PerChannel
    }

    fn pwm_init(&self) -> PwmInit {
        PwmInit::EnableImmediately
    }

    fn adc_device(&self) -> u32 {
        1
    }

    fn tristate_line(&self) -> Option<u32> {
        Some(TRISTATE_LINE)
    }

    fn startup_mode(&self) -> Option<PinMode> {
        Some(PinMode::Input)
    }
}
