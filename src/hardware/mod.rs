// src/hardware/mod.rs - Backend contract for control-file I/O
//!
//! The pin controller never touches the filesystem directly. Every control
//! write and every persistent read/write handle goes through [`HardwareIo`],
//! so the same configuration engine drives real sysfs ([`SysfsIo`]) or an
//! in-memory log ([`RecordingIo`]).

pub mod recording;
pub mod sysfs;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use recording::{IoOp, RecordingHandle, RecordingIo};
pub use sysfs::{SysfsHandle, SysfsIo};

#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("I/O on {} failed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected value {value:?} read from {}", .path.display())]
    Parse { path: PathBuf, value: String },
}

impl HardwareError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        HardwareError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            HardwareError::Io { path, .. } | HardwareError::Parse { path, .. } => path,
        }
    }
}

/// A control file kept open for repeated reads and writes.
pub trait IoHandle {
    fn path(&self) -> &Path;

    /// Read the whole value from the start of the file.
    fn read_value(&mut self) -> Result<String, HardwareError>;

    /// Overwrite the value from the start of the file.
    fn write_value(&mut self, value: &str) -> Result<(), HardwareError>;
}

/// Writes to control files and opens persistent handles on them.
pub trait HardwareIo {
    type Handle: IoHandle;

    fn write(&mut self, path: &Path, value: &str) -> Result<(), HardwareError>;

    /// Like [`HardwareIo::write`], but a missing file is a no-op returning `false`.
    fn write_if_present(&mut self, path: &Path, value: &str) -> Result<bool, HardwareError>;

    fn open(&mut self, path: &Path) -> Result<Self::Handle, HardwareError>;
}
