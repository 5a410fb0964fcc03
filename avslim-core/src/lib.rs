//! Core library for batch audio/video optimization via ffmpeg and ffprobe.
//!
//! This crate provides media file discovery, external tool execution,
//! stream metadata extraction, and the sequential batch orchestration loop
//! with skip/resume semantics, running statistics, and guaranteed scratch
//! file cleanup.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use avslim_core::{BatchConfig, RunLog, find_media_files, process_files};
//! use avslim_core::external::{FfmpegEncoder, FfprobeProber};
//! use std::path::PathBuf;
//!
//! let config = BatchConfig::new(PathBuf::from("/path/to/media"));
//! config.validate().unwrap();
//!
//! let files = find_media_files(
//!     &config.input_dir,
//!     config.input_extensions(),
//!     config.recursive,
//!     Some(&config.output_dir()),
//! ).unwrap();
//!
//! let mut run_log = RunLog::create(&config.run_log_path()).unwrap();
//! let outcomes = process_files(
//!     &FfprobeProber::default(),
//!     &FfmpegEncoder::default(),
//!     &config,
//!     &files,
//!     &mut run_log,
//! ).unwrap();
//! ```

pub mod codecs;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod logging;
pub mod probe;
pub mod processing;
pub mod scratch;
pub mod stats;
pub mod utils;

// Re-exports for public API
pub use codecs::{AudioCodec, VideoCodec};
pub use config::{BatchConfig, WaitPolicy};
pub use discovery::find_media_files;
pub use error::{CoreError, CoreResult};
pub use external::{check_dependency, EncodeJob, Encoder, FfmpegEncoder, FfprobeProber, Prober};
pub use logging::RunLog;
pub use probe::{StreamParams, TrackKind};
pub use processing::process_files;
pub use stats::BatchStats;

use std::path::PathBuf;
use std::time::Duration;

/// Result of one encoded work item, with the figures fed to the ledger.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub elapsed: Duration,
    pub input_size: u64,
    pub output_size: u64,
}
