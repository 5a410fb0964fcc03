use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for avslim
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input path: {0}")]
    InvalidInputPath(String),

    #[error("Invalid codec selection: {0}")]
    InvalidCodecSelection(String),

    #[error("Required tool not found: {0}")]
    DependencyNotFound(String),

    #[error("ffprobe failed ({}): {stderr}", describe_exit(.code))]
    Probe { code: Option<i32>, stderr: String },

    #[error("ffmpeg failed ({}): {stderr}", describe_exit(.code))]
    Encode { code: Option<i32>, stderr: String },

    #[error("Failed to parse ffprobe output: {0}")]
    JsonParse(String),

    #[error("Invalid path: {0}")]
    PathError(String),
}

/// Result type for avslim operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code".to_string(),
    }
}

impl CoreError {
    /// Builds a `Probe` error from a finished ffprobe invocation.
    pub fn probe_failed(status: ExitStatus, stderr: impl Into<String>) -> Self {
        CoreError::Probe {
            code: status.code(),
            stderr: stderr.into(),
        }
    }

    /// Builds an `Encode` error from a finished ffmpeg invocation.
    pub fn encode_failed(status: ExitStatus, stderr: impl Into<String>) -> Self {
        CoreError::Encode {
            code: status.code(),
            stderr: stderr.into(),
        }
    }
}
