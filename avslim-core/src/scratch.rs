//! Scratch output lifecycle.
//!
//! The encoder always writes to a single shared temporary path inside the
//! output directory; a finished result is renamed into its final location.
//! `ScratchGuard` scopes that temporary artifact to the batch loop: whatever
//! way the loop exits (normal completion, propagated fatal error, panic),
//! dropping the guard removes a leftover temp file and removes the output
//! directory if it ended up empty. Cleanup is best-effort and never masks
//! the original termination cause.

use crate::error::CoreResult;
use crate::utils::file_timestamp;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ScratchGuard {
    temp_path: PathBuf,
    output_dir: PathBuf,
}

impl ScratchGuard {
    /// Creates the output directory (if needed) and reserves the shared
    /// temporary output path inside it. The file itself is not created;
    /// the encoder does that.
    pub fn new(output_dir: &Path, extension: &str) -> CoreResult<Self> {
        std::fs::create_dir_all(output_dir)?;
        let temp_path = output_dir.join(format!("tmp-{}.{extension}", file_timestamp()));
        Ok(Self {
            temp_path,
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// The shared temporary output path the encoder writes to.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Commits the temporary artifact to its final location, creating
    /// intermediate directories as needed. After this the temp file no
    /// longer exists until the next item's encode recreates it.
    pub fn commit(&self, final_path: &Path) -> CoreResult<()> {
        if let Some(parent) = final_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(&self.temp_path, final_path)?;
        Ok(())
    }
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if self.temp_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                log::warn!(
                    "Failed to remove temporary file '{}': {e}",
                    self.temp_path.display()
                );
            }
        }
        // Remove the output directory only when nothing was produced in it.
        if let Ok(mut entries) = std::fs::read_dir(&self.output_dir) {
            if entries.next().is_none() {
                if let Err(e) = std::fs::remove_dir(&self.output_dir) {
                    log::warn!(
                        "Failed to remove empty output directory '{}': {e}",
                        self.output_dir.display()
                    );
                }
            }
        }
    }
}
