// src/pwm.rs - PWM channel state and the two period models
use crate::board::{BoardProfile, PeriodModel};
use crate::hardware::{HardwareError, HardwareIo};
use crate::paths::SysfsLayout;
use serde::Serialize;
use std::collections::BTreeMap;

/// Highest value accepted by `analog_write`.
pub const DUTY_MAX: u64 = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PwmChannelState {
    pub exported: bool,
    pub enabled: bool,
    /// Only used by per-channel boards; `None` means the board default.
    pub period: Option<u64>,
}

/// Which outputs a period change reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodScope {
    Channel,
    /// Every PWM output on the board, including ones configured earlier.
    Board,
}

#[derive(Debug, Clone)]
pub struct PwmState {
    model: PeriodModel,
    default_period: u64,
    channels: BTreeMap<u32, PwmChannelState>,
    shared_period: u64,
    shared_written: bool,
}

impl PwmState {
    pub fn new(board: &dyn BoardProfile) -> Self {
        let default_period = board.period_bounds().default;
        Self {
            model: board.period_model(),
            default_period,
            channels: BTreeMap::new(),
            shared_period: default_period,
            shared_written: false,
        }
    }

    pub fn model(&self) -> PeriodModel {
        self.model
    }

    pub fn channel(&self, channel: u32) -> Option<&PwmChannelState> {
        self.channels.get(&channel)
    }

    fn entry(&mut self, channel: u32) -> &mut PwmChannelState {
        self.channels.entry(channel).or_default()
    }

    /// Period currently governing `channel`.
    pub fn period(&self, channel: u32) -> u64 {
        match self.model {
            PeriodModel::PerChannel => self
                .channels
                .get(&channel)
                .and_then(|c| c.period)
                .unwrap_or(self.default_period),
            PeriodModel::Shared => self.shared_period,
        }
    }

    /// Whether the shared register has been written since startup.
    pub fn shared_period_written(&self) -> bool {
        self.shared_written
    }

    /// Write `period` to the register governing `channel` and cache it.
    ///
    /// Per-channel boards only cache the value while the channel is not
    /// exported; channel init writes it later.
    pub fn set_period<B: HardwareIo>(
        &mut self,
        io: &mut B,
        layout: &SysfsLayout,
        channel: u32,
        period: u64,
    ) -> Result<PeriodScope, HardwareError> {
        match self.model {
            PeriodModel::PerChannel => {
                if self.entry(channel).exported {
                    io.write(&layout.pwm_period(channel), &period.to_string())?;
                }
                self.entry(channel).period = Some(period);
                Ok(PeriodScope::Channel)
            }
            PeriodModel::Shared => {
                io.write(&layout.pwm_shared_period(), &period.to_string())?;
                self.shared_period = period;
                self.shared_written = true;
                Ok(PeriodScope::Board)
            }
        }
    }

    pub fn mark_exported(&mut self, channel: u32) {
        self.entry(channel).exported = true;
    }

    pub fn is_enabled(&self, channel: u32) -> bool {
        self.channels.get(&channel).is_some_and(|c| c.enabled)
    }

    pub fn set_enabled(&mut self, channel: u32, enabled: bool) {
        self.entry(channel).enabled = enabled;
    }

    /// Duty cycle in nanoseconds for a clamped 0..=255 value.
    pub fn duty_cycle(&self, channel: u32, value: u64) -> u64 {
        self.period(channel) * value.min(DUTY_MAX) / DUTY_MAX
    }

    /// Forget exported/enabled flags after cleanup; cached periods survive,
    /// as does the fact that the shared register was written.
    pub fn reset(&mut self) {
        for state in self.channels.values_mut() {
            state.exported = false;
            state.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Galileo, GalileoGen2};
    use crate::hardware::RecordingIo;

    #[test]
    fn test_duty_cycle_truncates() {
        let pwm = PwmState::new(&GalileoGen2);
        assert_eq!(pwm.duty_cycle(1, 0), 0);
        assert_eq!(pwm.duty_cycle(1, 255), 5_000_000);
        assert_eq!(pwm.duty_cycle(1, 1), 19_607);
        assert_eq!(pwm.duty_cycle(1, 128), 2_509_803);
    }

    #[test]
    fn test_per_channel_period_is_independent() {
        let layout = SysfsLayout::default();
        let mut io = RecordingIo::new();
        let mut pwm = PwmState::new(&Galileo);
        pwm.mark_exported(3);
        assert_eq!(pwm.set_period(&mut io, &layout, 3, 1_000_000).unwrap(), PeriodScope::Channel);
        assert_eq!(pwm.period(3), 1_000_000);
        assert_eq!(pwm.period(5), 5_000_000);
        assert_eq!(io.writes_to(&layout.pwm_period(3)), vec!["1000000"]);
    }

    #[test]
    fn test_per_channel_period_cached_before_export() {
        let layout = SysfsLayout::default();
        let mut io = RecordingIo::new();
        let mut pwm = PwmState::new(&Galileo);
        pwm.set_period(&mut io, &layout, 4, 2_000_000).unwrap();
        assert!(io.ops().is_empty());
        assert_eq!(pwm.period(4), 2_000_000);
    }

    #[test]
    fn test_shared_period_applies_to_all_channels() {
        let layout = SysfsLayout::default();
        let mut io = RecordingIo::new();
        let mut pwm = PwmState::new(&GalileoGen2);
        assert!(!pwm.shared_period_written());
        assert_eq!(pwm.set_period(&mut io, &layout, 1, 1_000_000).unwrap(), PeriodScope::Board);
        assert!(pwm.shared_period_written());
        assert_eq!(pwm.period(1), 1_000_000);
        assert_eq!(pwm.period(9), 1_000_000);
        assert_eq!(io.writes_to(&layout.pwm_shared_period()), vec!["1000000"]);
    }

    #[test]
    fn test_failed_write_keeps_cached_period() {
        let layout = SysfsLayout::default();
        let mut io = RecordingIo::new();
        io.fail_on(layout.pwm_shared_period());
        let mut pwm = PwmState::new(&GalileoGen2);
        assert!(pwm.set_period(&mut io, &layout, 1, 1_000_000).is_err());
        assert_eq!(pwm.period(1), 5_000_000);
        assert!(!pwm.shared_period_written());
    }
}
