// Resource release: explicit cleanup, repeated cleanup, partial failure and drop

mod common;

use common::recording_controller;
use wiring_rs::{BoardKind, GpioError, Level, PinController, PinMode, RecordingIo, SysfsLayout};

#[test]
fn test_cleanup_unexports_every_tracked_resource() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    gpio.configure(13, PinMode::Output).unwrap();
    gpio.configure(3, PinMode::Pwm).unwrap();
    gpio.configure(14, PinMode::AnalogInput).unwrap();
    let lines: Vec<u32> = gpio.tracker().exported_lines().collect();
    assert_eq!(gpio.tracker().handle_count(), 2);
    assert_eq!(gpio.tracker().exported_pwm_channels().collect::<Vec<_>>(), vec![1]);
    io.clear();

    gpio.cleanup().unwrap();

    let layout = gpio.layout().clone();
    let unexported: Vec<String> = io.writes_to(&layout.unexport());
    assert_eq!(unexported, lines.iter().map(|l| l.to_string()).collect::<Vec<_>>());
    assert_eq!(io.writes_to(&layout.pwm_unexport()), vec!["1"]);
    assert!(gpio.tracker().is_empty());
    assert_eq!(gpio.tracker().handle_count(), 0);
    assert_eq!(gpio.tracker().exported_pwm_channels().count(), 0);
    assert_eq!(gpio.pin_state(13), None);
}

#[test]
fn test_cleanup_twice_is_a_no_op() {
    let (mut gpio, io) = recording_controller(BoardKind::Galileo);
    gpio.configure(9, PinMode::Pwm).unwrap();
    gpio.cleanup().unwrap();
    io.clear();

    gpio.cleanup().unwrap();
    assert!(io.ops().is_empty());
}

#[test]
fn test_cleanup_continues_past_failures() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    gpio.configure(13, PinMode::Output).unwrap();
    gpio.configure(5, PinMode::Pwm).unwrap();
    let line_count = gpio.tracker().exported_lines().count();
    let layout = gpio.layout().clone();
    io.fail_on(layout.unexport());
    io.clear();

    match gpio.cleanup() {
        Err(GpioError::Cleanup(failures)) => assert_eq!(failures.len(), line_count),
        other => panic!("expected cleanup failure, got {:?}", other),
    }
    assert_eq!(io.writes_to(&layout.pwm_unexport()), vec!["3"]);
    assert!(gpio.tracker().is_empty());

    io.heal(&layout.unexport());
    gpio.cleanup().unwrap();
}

#[test]
fn test_pins_can_be_reconfigured_after_cleanup() {
    let (mut gpio, io) = recording_controller(BoardKind::GalileoGen2);
    gpio.configure(13, PinMode::Output).unwrap();
    gpio.cleanup().unwrap();
    io.clear();

    gpio.configure(13, PinMode::Output).unwrap();
    assert_eq!(io.writes_to(&gpio.layout().export()), vec!["7", "46", "30", "31"]);
}

#[test]
fn test_edison_cleanup_releases_tristate_line() {
    let (mut gpio, io) = recording_controller(BoardKind::Edison);
    gpio.cleanup().unwrap();
    assert!(io.writes_to(&gpio.layout().unexport()).contains(&"214".to_string()));
}

#[test]
fn test_drop_releases_resources() {
    let io = RecordingIo::new();
    {
        let board = BoardKind::GalileoGen2.profile();
        let mut gpio = PinController::new(board, io.clone(), SysfsLayout::default()).unwrap();
        gpio.configure(13, PinMode::Output).unwrap();
        gpio.configure(6, PinMode::Pwm).unwrap();
        io.clear();
    }
    let layout = SysfsLayout::default();
    assert!(io.writes_to(&layout.unexport()).contains(&"7".to_string()));
    assert_eq!(io.writes_to(&layout.pwm_unexport()), vec!["5"]);
}

#[test]
fn test_drop_after_cleanup_writes_nothing() {
    let io = RecordingIo::new();
    {
        let board = BoardKind::Galileo.profile();
        let mut gpio = PinController::new(board, io.clone(), SysfsLayout::default()).unwrap();
        gpio.configure(2, PinMode::Input).unwrap();
        gpio.cleanup().unwrap();
        io.clear();
    }
    assert!(io.ops().is_empty());
}

#[test]
fn test_detached_output_keeps_its_level() {
    let io = RecordingIo::new();
    let layout = SysfsLayout::default();
    {
        let board = BoardKind::GalileoGen2.profile();
        let mut gpio = PinController::new(board, io.clone(), layout.clone()).unwrap();
        gpio.configure(13, PinMode::Output).unwrap();
        gpio.digital_write(13, Level::High).unwrap();
        gpio.detach();
        assert!(gpio.tracker().is_empty());
        assert_eq!(gpio.pin_state(13), None);
        io.clear();
    }
    assert!(io.ops().is_empty());
    assert_eq!(io.value(&layout.value(7)).as_deref(), Some("1"));
}

