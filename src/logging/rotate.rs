//! Size-based rotating log file writer.
//!
//! # Responsibilities
//! - Cap the active log file at a configured size
//! - Retain a bounded number of rolled-over backups
//!
//! # Design Decisions
//! - Rotation happens before the write that would cross the cap, so a
//!   record is never split across files
//! - Backups are `<path>.1` (newest) through `<path>.N` (oldest); the
//!   shift drops anything past the retention count
//! - Output is plain UTF-8 text, one record per line

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

struct RotateState {
    file: File,
    written: u64,
}

/// Thread-safe writer that rotates the target file by size.
///
/// Cloning is cheap; all clones share the same underlying file.
#[derive(Clone)]
pub struct RotatingWriter {
    inner: Arc<RotatingInner>,
}

struct RotatingInner {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    state: Mutex<RotateState>,
}

impl RotatingWriter {
    /// Open (or create) the active log file in append mode.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: u32) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            inner: Arc::new(RotatingInner {
                path,
                max_bytes,
                backup_count,
                state: Mutex::new(RotateState { file, written }),
            }),
        })
    }

    /// Size of the active file in bytes.
    pub fn current_size(&self) -> u64 {
        match self.inner.state.lock() {
            Ok(state) => state.written,
            Err(poisoned) => poisoned.into_inner().written,
        }
    }

    /// Path of the n-th backup (1 = newest).
    pub fn backup_path(&self, n: u32) -> PathBuf {
        backup_path(&self.inner.path, n)
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn backup_path(path: &Path, n: u32) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

impl RotatingInner {
    /// Shift backups up one slot and reopen a fresh active file.
    fn rotate(&self, state: &mut RotateState) -> io::Result<()> {
        state.file.flush()?;

        // Oldest backup falls off the end.
        let last = backup_path(&self.path, self.backup_count);
        if last.exists() {
            std::fs::remove_file(&last)?;
        }
        for n in (1..self.backup_count).rev() {
            let from = backup_path(&self.path, n);
            if from.exists() {
                std::fs::rename(&from, backup_path(&self.path, n + 1))?;
            }
        }
        std::fs::rename(&self.path, backup_path(&self.path, 1))?;

        state.file = open_append(&self.path)?;
        state.written = 0;
        Ok(())
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .inner
            .state
            .lock()
            .map_err(|_| io::Error::other("rotate lock poisoned"))?;

        if state.written > 0 && state.written + buf.len() as u64 > self.inner.max_bytes {
            self.inner.rotate(&mut state)?;
        }

        let n = state.file.write(buf)?;
        state.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .inner
            .state
            .lock()
            .map_err(|_| io::Error::other("rotate lock poisoned"))?;
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingWriter {
    type Writer = RotatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
