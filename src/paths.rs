// src/paths.rs - Control file locations for GPIO, PWM and ADC
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Roots of the kernel control trees. Every control path the controller
/// touches is derived from these, so tests can point them at a temp dir.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SysfsLayout {
    #[serde(default = "default_gpio_root")]
    pub gpio_root: PathBuf,
    #[serde(default = "default_pwm_chip")]
    pub pwm_chip: PathBuf,
    #[serde(default = "default_iio_root")]
    pub iio_root: PathBuf,
    #[serde(default = "default_pinmux_root")]
    pub pinmux_root: PathBuf,
}

impl Default for SysfsLayout {
    fn default() -> Self {
        Self {
            gpio_root: default_gpio_root(),
            pwm_chip: default_pwm_chip(),
            iio_root: default_iio_root(),
            pinmux_root: default_pinmux_root(),
        }
    }
}

impl SysfsLayout {
    /// Layout with all four trees under one directory, mirroring the real
    /// absolute paths.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            gpio_root: root.join("sys/class/gpio"),
            pwm_chip: root.join("sys/class/pwm/pwmchip0"),
            iio_root: root.join("sys/bus/iio/devices"),
            pinmux_root: root.join("sys/kernel/debug/gpio_debug"),
        }
    }

    pub fn export(&self) -> PathBuf {
        self.gpio_root.join("export")
    }

    pub fn unexport(&self) -> PathBuf {
        self.gpio_root.join("unexport")
    }

    fn line_dir(&self, line: u32) -> PathBuf {
        self.gpio_root.join(format!("gpio{}", line))
    }

    pub fn direction(&self, line: u32) -> PathBuf {
        self.line_dir(line).join("direction")
    }

    pub fn value(&self, line: u32) -> PathBuf {
        self.line_dir(line).join("value")
    }

    pub fn drive(&self, line: u32) -> PathBuf {
        self.line_dir(line).join("drive")
    }

    pub fn pinmux(&self, line: u32) -> PathBuf {
        self.pinmux_root
            .join(format!("gpio{}", line))
            .join("current_pinmux")
    }

    pub fn pwm_export(&self) -> PathBuf {
        self.pwm_chip.join("export")
    }

    pub fn pwm_unexport(&self) -> PathBuf {
        self.pwm_chip.join("unexport")
    }

    fn pwm_dir(&self, channel: u32) -> PathBuf {
        self.pwm_chip.join(format!("pwm{}", channel))
    }

    pub fn pwm_period(&self, channel: u32) -> PathBuf {
        self.pwm_dir(channel).join("period")
    }

    pub fn pwm_duty_cycle(&self, channel: u32) -> PathBuf {
        self.pwm_dir(channel).join("duty_cycle")
    }

    pub fn pwm_enable(&self, channel: u32) -> PathBuf {
        self.pwm_dir(channel).join("enable")
    }

    /// Device-wide period register on boards where channels share one.
    pub fn pwm_shared_period(&self) -> PathBuf {
        self.pwm_chip.join("device").join("pwm_period")
    }

    pub fn adc_raw(&self, device: u32, channel: u32) -> PathBuf {
        self.iio_root
            .join(format!("iio:device{}", device))
            .join(format!("in_voltage{}_raw", channel))
    }
}

fn default_gpio_root() -> PathBuf {
    PathBuf::from("/sys/class/gpio")
}

fn default_pwm_chip() -> PathBuf {
    PathBuf::from("/sys/class/pwm/pwmchip0")
}

fn default_iio_root() -> PathBuf {
    PathBuf::from("/sys/bus/iio/devices")
}

fn default_pinmux_root() -> PathBuf {
    PathBuf::from("/sys/kernel/debug/gpio_debug")
}
