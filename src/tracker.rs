// src/tracker.rs - Bookkeeping of exported lines, PWM channels and open handles
use crate::hardware::{HardwareError, HardwareIo, IoHandle};
use crate::paths::SysfsLayout;
use std::collections::{BTreeMap, BTreeSet};

/// Everything a controller has exported or opened, so a single
/// [`ResourceTracker::release_all`] pass can put the board back.
#[derive(Debug)]
pub struct ResourceTracker<H> {
    lines: BTreeSet<u32>,
    pwm_channels: BTreeSet<u32>,
    handles: BTreeMap<u32, H>,
}

impl<H> Default for ResourceTracker<H> {
    fn default() -> Self {
        Self {
            lines: BTreeSet::new(),
            pwm_channels: BTreeSet::new(),
            handles: BTreeMap::new(),
        }
    }
}

impl<H: IoHandle> ResourceTracker<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the line was already tracked.
    pub fn track_line_export(&mut self, line: u32) -> bool {
        self.lines.insert(line)
    }

    pub fn is_line_exported(&self, line: u32) -> bool {
        self.lines.contains(&line)
    }

    /// Returns `false` if the channel was already tracked.
    pub fn track_pwm_export(&mut self, channel: u32) -> bool {
        self.pwm_channels.insert(channel)
    }

    pub fn is_pwm_exported(&self, channel: u32) -> bool {
        self.pwm_channels.contains(&channel)
    }

    /// Keep `handle` for `line`, returning the one it replaces.
    pub fn retain_handle(&mut self, line: u32, handle: H) -> Option<H> {
        self.handles.insert(line, handle)
    }

    pub fn handle_mut(&mut self, line: u32) -> Option<&mut H> {
        self.handles.get_mut(&line)
    }

    pub fn has_handle(&self, line: u32) -> bool {
        self.handles.contains_key(&line)
    }

    /// Close the handle for `line`, if any.
    pub fn release_handle(&mut self, line: u32) -> bool {
        self.handles.remove(&line).is_some()
    }

    pub fn exported_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.iter().copied()
    }

    pub fn exported_pwm_channels(&self) -> impl Iterator<Item = u32> + '_ {
        self.pwm_channels.iter().copied()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.pwm_channels.is_empty() && self.handles.is_empty()
    }

    /// Drop all tracking without releasing anything, returning how many
    /// lines and PWM channels were let go.
    pub fn forget_all(&mut self) -> (usize, usize) {
        self.handles.clear();
        let lines = std::mem::take(&mut self.lines).len();
        let channels = std::mem::take(&mut self.pwm_channels).len();
        (lines, channels)
    }

    /// Close every handle, then unexport every line and PWM channel.
    ///
    /// Every release is attempted even after a failure; the failures are
    /// returned and tracking is empty afterwards either way.
    pub fn release_all<B>(&mut self, io: &mut B, layout: &SysfsLayout) -> Vec<HardwareError>
    where
        B: HardwareIo<Handle = H>,
    {
        let mut failures = Vec::new();

        let closed = self.handles.len();
        self.handles.clear();

        let lines = std::mem::take(&mut self.lines);
        let unexport = layout.unexport();
        for line in &lines {
            if let Err(e) = io.write(&unexport, &line.to_string()) {
                failures.push(e);
            }
        }

        let channels = std::mem::take(&mut self.pwm_channels);
        let pwm_unexport = layout.pwm_unexport();
        for channel in &channels {
            if let Err(e) = io.write(&pwm_unexport, &channel.to_string()) {
                failures.push(e);
            }
        }

        if closed + lines.len() + channels.len() > 0 {
            tracing::info!(
                "Released {} handle(s), {} line(s), {} PWM channel(s) with {} failure(s)",
                closed,
                lines.len(),
                channels.len(),
                failures.len()
            );
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{RecordingHandle, RecordingIo};
    use std::path::Path;

    fn layout() -> SysfsLayout {
        SysfsLayout::default()
    }

    #[test]
    fn test_tracking_is_idempotent() {
        let mut tracker: ResourceTracker<RecordingHandle> = ResourceTracker::new();
        assert!(tracker.track_line_export(7));
        assert!(!tracker.track_line_export(7));
        assert!(tracker.track_pwm_export(1));
        assert!(!tracker.track_pwm_export(1));
        assert_eq!(tracker.exported_lines().count(), 1);
    }

    #[test]
    fn test_release_all_unexports_everything() {
        let mut io = RecordingIo::new();
        let mut tracker = ResourceTracker::new();
        tracker.track_line_export(7);
        tracker.track_line_export(46);
        tracker.track_pwm_export(1);
        let handle = io.open(Path::new("/sys/class/gpio/gpio7/value")).unwrap();
        tracker.retain_handle(7, handle);

        let failures = tracker.release_all(&mut io, &layout());
        assert!(failures.is_empty());
        assert!(tracker.is_empty());

        let mut unexported = io.writes_to(&layout().unexport());
        unexported.sort();
        assert_eq!(unexported, vec!["46", "7"]);
        assert_eq!(io.writes_to(&layout().pwm_unexport()), vec!["1"]);
    }

    #[test]
    fn test_release_all_on_empty_state_is_noop() {
        let mut io = RecordingIo::new();
        let mut tracker: ResourceTracker<RecordingHandle> = ResourceTracker::new();
        assert!(tracker.release_all(&mut io, &layout()).is_empty());
        assert!(tracker.release_all(&mut io, &layout()).is_empty());
        assert!(io.ops().is_empty());
    }

    #[test]
    fn test_release_all_continues_past_failures() {
        let mut io = RecordingIo::new();
        io.fail_on(layout().unexport());
        let mut tracker: ResourceTracker<RecordingHandle> = ResourceTracker::new();
        tracker.track_line_export(7);
        tracker.track_line_export(8);
        tracker.track_pwm_export(3);

        let failures = tracker.release_all(&mut io, &layout());
        assert_eq!(failures.len(), 2);
        assert!(tracker.is_empty());
        assert_eq!(io.writes_to(&layout().pwm_unexport()), vec!["3"]);
    }

    #[test]
    fn test_forget_all_issues_no_writes() {
        let mut io = RecordingIo::new();
        let mut tracker = ResourceTracker::new();
        tracker.track_line_export(7);
        tracker.track_pwm_export(1);
        let handle = io.open(Path::new("/sys/class/gpio/gpio7/value")).unwrap();
        tracker.retain_handle(7, handle);
        io.clear();

        assert_eq!(tracker.forget_all(), (1, 1));
        assert!(tracker.is_empty());
        assert!(tracker.release_all(&mut io, &layout()).is_empty());
        assert!(io.ops().is_empty());
    }
}
