//! ffprobe execution.

use crate::error::{CoreError, CoreResult};
use crate::external::Prober;
use serde_json::Value;
use std::path::Path;
use std::process::Command;

/// Invokes ffprobe as a blocking child process and parses its JSON output.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    bin: String,
}

impl FfprobeProber {
    #[must_use]
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl Prober for FfprobeProber {
    fn probe(&self, file: &Path) -> CoreResult<Value> {
        log::debug!("Running ffprobe on: {}", file.display());

        let output = Command::new(&self.bin)
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg(file)
            .output()
            .map_err(|e| CoreError::Probe {
                code: None,
                stderr: format!("failed to start {}: {e}", self.bin),
            })?;

        if !output.status.success() {
            return Err(CoreError::probe_failed(
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| CoreError::JsonParse(e.to_string()))
    }
}
