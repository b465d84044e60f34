// src/hardware/sysfs.rs - Control-file backend over the Linux sysfs/debugfs trees
use super::{HardwareError, HardwareIo, IoHandle};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Backend writing straight to kernel control files.
#[derive(Debug, Default)]
pub struct SysfsIo;

impl SysfsIo {
    pub fn new() -> Self {
        Self
    }
}

impl HardwareIo for SysfsIo {
    type Handle = SysfsHandle;

    fn write(&mut self, path: &Path, value: &str) -> Result<(), HardwareError> {
        tracing::debug!("write {:<8} > {}", value, path.display());
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| HardwareError::io(path, e))?;
        file.write_all(value.as_bytes())
            .map_err(|e| HardwareError::io(path, e))
    }

    fn write_if_present(&mut self, path: &Path, value: &str) -> Result<bool, HardwareError> {
        if !path.exists() {
            tracing::trace!("skip {:<8} > {} (absent)", value, path.display());
            return Ok(false);
        }
        self.write(path, value)?;
        Ok(true)
    }

    fn open(&mut self, path: &Path) -> Result<SysfsHandle, HardwareError> {
        tracing::debug!("open {}", path.display());
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| HardwareError::io(path, e))?;
        Ok(SysfsHandle {
            file,
            path: path.to_path_buf(),
        })
    }
}

/// Open control file; sysfs attributes must be re-read from offset 0.
#[derive(Debug)]
pub struct SysfsHandle {
    file: File,
    path: PathBuf,
}

impl IoHandle for SysfsHandle {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_value(&mut self) -> Result<String, HardwareError> {
        let mut contents = String::new();
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.read_to_string(&mut contents))
            .map_err(|e| HardwareError::io(&self.path, e))?;
        Ok(contents)
    }

    fn write_value(&mut self, value: &str) -> Result<(), HardwareError> {
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.write_all(value.as_bytes()))
            .and_then(|_| self.file.flush())
            .map_err(|e| HardwareError::io(&self.path, e))
    }
}
