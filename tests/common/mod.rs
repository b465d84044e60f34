// Shared helpers for controller integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use wiring_rs::board::{BoardKind, MuxStep, MuxTarget};
use wiring_rs::hardware::IoOp;
use wiring_rs::{PinController, RecordingIo, SysfsLayout};

pub const BOARDS: [BoardKind; 3] = [BoardKind::Galileo, BoardKind::GalileoGen2, BoardKind::Edison];

/// Controller over a fresh recording backend, with startup writes discarded.
pub fn recording_controller(kind: BoardKind) -> (PinController<RecordingIo>, RecordingIo) {
    let io = RecordingIo::new();
    let gpio = PinController::new(kind.profile(), io.clone(), SysfsLayout::default())
        .expect("controller startup");
    io.clear();
    (gpio, io)
}

/// The write that marks `step` as applied, given whether the board has drive files.
fn signature(layout: &SysfsLayout, step: &MuxStep, has_drive: bool) -> (PathBuf, String) {
    match step.target {
        MuxTarget::High => (layout.value(step.line), "1".to_string()),
        MuxTarget::Low => (layout.value(step.line), "0".to_string()),
        MuxTarget::HiZ if has_drive => (layout.drive(step.line), "hiz".to_string()),
        MuxTarget::HiZ => (layout.direction(step.line), "in".to_string()),
        MuxTarget::Function(mode) => (layout.pinmux(step.line), mode.as_str().to_string()),
    }
}

/// Index of each step's signature write, searched strictly after the previous one.
pub fn step_positions(ops: &[IoOp], steps: &[MuxStep], has_drive: bool) -> Option<Vec<usize>> {
    let layout = SysfsLayout::default();
    let mut positions = Vec::with_capacity(steps.len());
    let mut from = 0;
    for step in steps {
        let (path, value) = signature(&layout, step, has_drive);
        let found = ops[from..].iter().position(|op| {
            matches!(op, IoOp::Write { path: p, value: v } if *p == path && *v == value)
        })?;
        positions.push(from + found);
        from += found + 1;
    }
    Some(positions)
}
