// PWM duty cycle, period bounds and the two period models

mod common;

use common::{BOARDS, recording_controller};
use wiring_rs::board::PeriodModel;
use wiring_rs::{BoardKind, GpioError, PeriodScope, PinMode};

#[test]
fn test_analog_write_clamps_and_truncates() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    gpio.configure(3, PinMode::Pwm).unwrap();
    let duty = gpio.layout().pwm_duty_cycle(1);

    let cases = [
        (-40, 0u64),
        (0, 0),
        (1, 19_607),
        (128, 2_509_803),
        (255, 5_000_000),
        (1000, 5_000_000),
    ];
    for (value, expected) in cases {
        gpio.analog_write(3, value).unwrap();
        assert_eq!(io.value(&duty).unwrap(), expected.to_string(), "value {}", value);
    }
}

#[test]
fn test_duty_uses_current_period() {
    let (mut gpio, io) = recording_controller(BoardKind::Galileo);
    gpio.configure(9, PinMode::Pwm).unwrap();
    gpio.set_pwm_period(9, 1_000_000).unwrap();
    gpio.analog_write(9, 51).unwrap();
    assert_eq!(io.value(&gpio.layout().pwm_duty_cycle(1)).as_deref(), Some("200000"));
}

#[test]
fn test_channel_enabled_lazily_once() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    gpio.configure(5, PinMode::Pwm).unwrap();
    let enable = gpio.layout().pwm_enable(3);
    assert!(io.writes_to(&enable).is_empty());

    let state = gpio.pwm().channel(3).copied().unwrap();
    assert!(state.exported);
    assert!(!state.enabled);

    gpio.analog_write(5, 10).unwrap();
    gpio.analog_write(5, 20).unwrap();
    assert_eq!(io.writes_to(&enable), vec!["1"]);
    assert!(gpio.pwm().is_enabled(3));
}

#[test]
fn test_edison_enables_during_configure() {
    let (mut gpio, io) = recording_controller(BoardKind::Edison);
    gpio.configure(6, PinMode::Pwm).unwrap();
    let enable = gpio.layout().pwm_enable(2);
    assert_eq!(io.writes_to(&enable), vec!["1"]);
    assert_eq!(io.writes_to(&gpio.layout().pwm_period(2)), vec!["2048000"]);
    gpio.analog_write(6, 255).unwrap();
    assert_eq!(io.writes_to(&enable).len(), 1);
}

#[test]
fn test_period_bounds_are_inclusive() {
    for kind in BOARDS {
        let board = kind.profile();
        let bounds = board.period_bounds();
        let (mut gpio, io) = recording_controller(kind);
        let pin = board.pwm_mapping()[0].0;
        gpio.configure(pin, PinMode::Pwm).unwrap();

        for period in [bounds.min, bounds.max] {
            assert!(gpio.set_pwm_period(pin, period).is_ok(), "{} {}", board.name(), period);
            assert_eq!(gpio.pwm_period(pin).unwrap(), period);
        }

        io.clear();
        for period in [bounds.min - 1, bounds.max + 1] {
            let err = gpio.set_pwm_period(pin, period).unwrap_err();
            assert!(
                matches!(err, GpioError::OutOfRangePeriod { .. }),
                "{} {}",
                board.name(),
                period
            );
        }
        assert!(io.ops().is_empty(), "{}: rejected period reached hardware", board.name());
        assert_eq!(gpio.pwm_period(pin).unwrap(), bounds.max);
    }
}

#[test]
fn test_period_on_pin_without_pwm() {
    let (mut gpio, _io) = recording_controller(BoardKind::Edison);
    assert!(matches!(
        gpio.set_pwm_period(10, 1_000_000),
        Err(GpioError::UnsupportedMode { pin: 10, mode: PinMode::Pwm })
    ));
    assert!(matches!(gpio.configure(11, PinMode::Pwm), Err(GpioError::UnsupportedMode { .. })));
}

#[test]
fn test_shared_period_written_once_across_pins() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    assert_eq!(gpio.pwm().model(), PeriodModel::Shared);
    let shared = gpio.layout().pwm_shared_period();

    gpio.configure(3, PinMode::Pwm).unwrap();
    gpio.configure(5, PinMode::Pwm).unwrap();
    gpio.configure(6, PinMode::Pwm).unwrap();

    assert_eq!(io.writes_to(&shared), vec!["5000000"]);
    assert!(io.writes_to(&gpio.layout().pwm_period(3)).is_empty());
}

#[test]
fn test_shared_period_change_is_board_wide() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    gpio.configure(3, PinMode::Pwm).unwrap();
    gpio.configure(9, PinMode::Pwm).unwrap();

    assert_eq!(gpio.set_pwm_period(9, 2_000_000).unwrap(), PeriodScope::Board);
    assert_eq!(gpio.pwm_period(3).unwrap(), 2_000_000);

    gpio.analog_write(3, 255).unwrap();
    assert_eq!(io.value(&gpio.layout().pwm_duty_cycle(1)).as_deref(), Some("2000000"));
}

#[test]
fn test_shared_period_set_before_configure_is_not_rewritten() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    gpio.set_pwm_period(3, 1_000_000).unwrap();
    gpio.configure(3, PinMode::Pwm).unwrap();
    assert_eq!(io.writes_to(&gpio.layout().pwm_shared_period()), vec!["1000000"]);
}

#[test]
fn test_per_channel_periods_are_independent() {
    let (mut gpio, io) = recording_controller(BoardKind::Galileo);
    assert_eq!(gpio.pwm().model(), PeriodModel::PerChannel);
    gpio.configure(3, PinMode::Pwm).unwrap();
    gpio.configure(5, PinMode::Pwm).unwrap();

    assert_eq!(gpio.set_pwm_period(3, 1_000_000).unwrap(), PeriodScope::Channel);
    assert_eq!(gpio.pwm_period(3).unwrap(), 1_000_000);
    assert_eq!(gpio.pwm_period(5).unwrap(), 5_000_000);
    assert_eq!(io.writes_to(&gpio.layout().pwm_period(3)), vec!["5000000", "1000000"]);
    assert_eq!(io.writes_to(&gpio.layout().pwm_period(5)), vec!["5000000"]);
}

#[test]
fn test_per_channel_period_cached_until_configure() {
    let (mut gpio, io) = recording_controller(BoardKind::Edison);
    gpio.set_pwm_period(9, 1_000_000).unwrap();
    assert!(io.ops().is_empty());
    gpio.configure(9, PinMode::Pwm).unwrap();
    assert_eq!(io.writes_to(&gpio.layout().pwm_period(3)), vec!["1000000"]);
}
