//! Per-run append-only log file.
//!
//! Every status line and executed command line is appended to a log file
//! alongside the output directory. The log is never truncated and never
//! parsed back. The sink is an explicit value passed into the orchestrator
//! rather than ambient process state; console logging stays on the `log`
//! facade, configured by the binary.

use crate::error::CoreResult;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RunLog {
    file: File,
    path: PathBuf,
}

impl RunLog {
    /// Opens (or creates) the log file in append mode.
    pub fn create(path: &Path) -> CoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry. Write failures degrade to a warning; logging must
    /// never abort the batch.
    pub fn line(&mut self, msg: &str) {
        if let Err(e) = writeln!(self.file, "{msg}").and_then(|()| self.file.flush()) {
            log::warn!("Failed to write run log '{}': {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_appends_without_truncating() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out-mp4").join("run.log");

        let mut log = RunLog::create(&path).unwrap();
        log.line("first");
        drop(log);

        let mut log = RunLog::create(&path).unwrap();
        log.line("second");
        drop(log);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
