//! ffmpeg job assembly and execution.

use crate::error::{CoreError, CoreResult};
use crate::external::Encoder;
use std::path::Path;
use std::process::Command;

/// The ordered argument list for one encode invocation (binary excluded).
/// Immutable once built; one per work item.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    args: Vec<String>,
}

impl EncodeJob {
    /// Assembles the argument list:
    /// `-i <input> <video codec> <video filters> <audio codec> -loglevel warning <output>`.
    #[must_use]
    pub fn build(
        input: &Path,
        output: &Path,
        video_args: &[String],
        filter_args: &[String],
        audio_args: &[String],
    ) -> Self {
        let mut args = vec!["-i".to_string(), input.to_string_lossy().into_owned()];
        args.extend_from_slice(video_args);
        args.extend_from_slice(filter_args);
        args.extend_from_slice(audio_args);
        args.push("-loglevel".to_string());
        args.push("warning".to_string());
        args.push(output.to_string_lossy().into_owned());
        Self { args }
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Renders the full command line for logging, shell-quoting arguments
    /// that need it.
    #[must_use]
    pub fn command_line(&self, bin: &str) -> String {
        std::iter::once(bin)
            .chain(self.args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || "'\"\\$&|;<>()`".contains(c)) {
        format!("'{}'", arg.replace('\'', "'\\''"))
    } else {
        arg.to_string()
    }
}

/// Invokes ffmpeg as a single blocking child process with captured output.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    bin: String,
}

impl FfmpegEncoder {
    #[must_use]
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&self, job: &EncodeJob) -> CoreResult<String> {
        let output = Command::new(&self.bin)
            .args(job.args())
            .output()
            .map_err(|e| CoreError::Encode {
                code: None,
                stderr: format!("failed to start {}: {e}", self.bin),
            })?;

        if !output.status.success() {
            return Err(CoreError::encode_failed(
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
