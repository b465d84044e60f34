// src/hardware/recording.rs - In-memory backend that logs every control operation
use super::{HardwareError, HardwareIo, IoHandle};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// One successful control operation, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoOp {
    Write { path: PathBuf, value: String },
    Open { path: PathBuf },
    HandleWrite { path: PathBuf, value: String },
    HandleRead { path: PathBuf },
}

impl IoOp {
    pub fn path(&self) -> &Path {
        match self {
            IoOp::Write { path, .. }
            | IoOp::Open { path }
            | IoOp::HandleWrite { path, .. }
            | IoOp::HandleRead { path } => path,
        }
    }
}

#[derive(Debug, Default)]
struct Recorder {
    ops: Vec<IoOp>,
    values: HashMap<PathBuf, String>,
    absent: HashSet<PathBuf>,
    failing: HashSet<PathBuf>,
    failing_values: HashSet<(PathBuf, String)>,
}

impl Recorder {
    fn check(&self, path: &Path) -> Result<(), HardwareError> {
        if self.failing.contains(path) {
            return Err(HardwareError::io(path, io::Error::other("injected failure")));
        }
        if self.absent.contains(path) {
            return Err(HardwareError::io(path, io::Error::from(io::ErrorKind::NotFound)));
        }
        Ok(())
    }

    fn check_value(&self, path: &Path, value: &str) -> Result<(), HardwareError> {
        self.check(path)?;
        if self.failing_values.contains(&(path.to_path_buf(), value.to_string())) {
            return Err(HardwareError::io(path, io::Error::other("injected failure")));
        }
        Ok(())
    }

    fn store(&mut self, op: IoOp, path: &Path, value: &str) {
        self.values.insert(path.to_path_buf(), value.to_string());
        self.ops.push(op);
    }
}

/// Clonable backend: clones share one log, so a test can keep a copy while
/// the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingIo {
    inner: Arc<Mutex<Recorder>>,
}

fn lock(inner: &Mutex<Recorder>) -> MutexGuard<'_, Recorder> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<IoOp> {
        lock(&self.inner).ops.clone()
    }

    /// Plain control writes as `(path, value)` pairs.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        lock(&self.inner)
            .ops
            .iter()
            .filter_map(|op| match op {
                IoOp::Write { path, value } => Some((path.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn writes_to(&self, path: &Path) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter(|(p, _)| p == path)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.inner).ops.clear();
    }

    /// Last value written to (or seeded for) `path`.
    pub fn value(&self, path: &Path) -> Option<String> {
        lock(&self.inner).values.get(path).cloned()
    }

    /// Seed what a handle on `path` reads, e.g. a raw ADC sample.
    pub fn set_value(&self, path: impl Into<PathBuf>, value: impl Into<String>) {
        lock(&self.inner).values.insert(path.into(), value.into());
    }

    /// Make `path` behave like a control file the board does not have.
    pub fn mark_absent(&self, path: impl Into<PathBuf>) {
        lock(&self.inner).absent.insert(path.into());
    }

    /// Make every operation on `path` fail.
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        lock(&self.inner).failing.insert(path.into());
    }

    /// Make writes of exactly `value` to `path` fail; other values succeed.
    pub fn fail_on_value(&self, path: impl Into<PathBuf>, value: impl Into<String>) {
        lock(&self.inner)
            .failing_values
            .insert((path.into(), value.into()));
    }

    pub fn heal(&self, path: &Path) {
        let mut recorder = lock(&self.inner);
        recorder.failing.remove(path);
        recorder.failing_values.retain(|(p, _)| p != path);
    }
}

impl HardwareIo for RecordingIo {
    type Handle = RecordingHandle;

    fn write(&mut self, path: &Path, value: &str) -> Result<(), HardwareError> {
        let mut recorder = lock(&self.inner);
        recorder.check_value(path, value)?;
        let op = IoOp::Write {
            path: path.to_path_buf(),
            value: value.to_string(),
        };
        recorder.store(op, path, value);
        Ok(())
    }

    fn write_if_present(&mut self, path: &Path, value: &str) -> Result<bool, HardwareError> {
        if lock(&self.inner).absent.contains(path) {
            return Ok(false);
        }
        self.write(path, value)?;
        Ok(true)
    }

    fn open(&mut self, path: &Path) -> Result<RecordingHandle, HardwareError> {
        let mut recorder = lock(&self.inner);
        recorder.check(path)?;
        recorder.ops.push(IoOp::Open {
            path: path.to_path_buf(),
        });
        Ok(RecordingHandle {
            path: path.to_path_buf(),
            inner: Arc::clone(&self.inner),
        })
    }
}

#[derive(Debug)]
pub struct RecordingHandle {
    path: PathBuf,
    inner: Arc<Mutex<Recorder>>,
}

impl IoHandle for RecordingHandle {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_value(&mut self) -> Result<String, HardwareError> {
        let mut recorder = lock(&self.inner);
        recorder.check(&self.path)?;
        recorder.ops.push(IoOp::HandleRead {
            path: self.path.clone(),
        });
        Ok(recorder
            .values
            .get(&self.path)
            .cloned()
            .unwrap_or_else(|| "0".to_string()))
    }

    fn write_value(&mut self, value: &str) -> Result<(), HardwareError> {
        let mut recorder = lock(&self.inner);
        recorder.check_value(&self.path, value)?;
        let op = IoOp::HandleWrite {
            path: self.path.clone(),
            value: value.to_string(),
        };
        recorder.store(op, &self.path, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_log() {
        let io = RecordingIo::new();
        let mut writer = io.clone();
        writer.write(Path::new("/sys/class/gpio/export"), "7").unwrap();
        assert_eq!(io.writes_to(Path::new("/sys/class/gpio/export")), vec!["7"]);
    }

    #[test]
    fn test_handle_reads_back_control_writes() {
        let mut io = RecordingIo::new();
        let path = Path::new("/sys/class/gpio/gpio7/value");
        io.write(path, "1").unwrap();
        let mut handle = io.open(path).unwrap();
        assert_eq!(handle.read_value().unwrap(), "1");
        handle.write_value("0").unwrap();
        assert_eq!(io.value(path).as_deref(), Some("0"));
    }

    #[test]
    fn test_absent_path_only_fails_strict_writes() {
        let mut io = RecordingIo::new();
        let path = Path::new("/sys/class/gpio/gpio7/direction");
        io.mark_absent(path);
        assert!(!io.write_if_present(path, "out").unwrap());
        assert!(io.write(path, "out").is_err());
        assert!(io.ops().is_empty());
    }

    #[test]
    fn test_injected_failure_is_not_recorded() {
        let mut io = RecordingIo::new();
        let path = Path::new("/sys/class/pwm/pwmchip0/export");
        io.fail_on(path);
        assert!(io.write(path, "1").is_err());
        assert!(io.ops().is_empty());
        io.heal(path);
        assert!(io.write(path, "1").is_ok());
    }

    #[test]
    fn test_value_specific_failure() {
        let mut io = RecordingIo::new();
        let path = Path::new("/sys/class/gpio/gpio214/direction");
        io.fail_on_value(path, "high");
        assert!(io.write(path, "low").is_ok());
        assert!(io.write(path, "high").is_err());
        assert_eq!(io.writes_to(path), vec!["low"]);
        io.heal(path);
        assert!(io.write(path, "high").is_ok());
    }
}
