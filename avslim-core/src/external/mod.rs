//! Interactions with the external ffmpeg/ffprobe tool pair.
//!
//! The orchestrator talks to the tools through the `Prober` and `Encoder`
//! traits so tests can substitute mock implementations; the concrete
//! implementations run the binaries as blocking child processes with
//! captured output.

use crate::error::{CoreError, CoreResult};
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Stdio};

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::{EncodeJob, FfmpegEncoder};
pub use ffprobe::FfprobeProber;

/// Read-only metadata extraction from a media file.
pub trait Prober {
    /// Probes `file` and returns the parsed stream description document.
    ///
    /// Any invocation failure (missing binary, non-zero exit, unparsable
    /// output) is a `CoreError::Probe` and is batch-fatal downstream.
    fn probe(&self, file: &Path) -> CoreResult<Value>;
}

/// A single blocking encode invocation.
pub trait Encoder {
    /// Runs the assembled job and returns captured stdout text on success.
    ///
    /// Non-zero exit or invocation error is a `CoreError::Encode`; the
    /// temporary artifact is left in place for the scratch guard.
    fn encode(&self, job: &EncodeJob) -> CoreResult<String>;
}

/// Checks that a required external command is available by invoking it with
/// `-version` and discarding its output.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => Err(CoreError::Io(e)),
    }
}
