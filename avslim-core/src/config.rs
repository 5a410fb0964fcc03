//! Batch configuration.
//!
//! Explicit configuration value constructed by the caller (the CLI) and
//! passed into the orchestrator; there is no process-wide mutable state.

use crate::codecs::{AudioCodec, VideoCodec};
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Inter-item pause policy between encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Fixed number of seconds.
    Fixed(u64),
    /// Derived from the previous item's encode time (elapsed / 7.5), to
    /// throttle thermal/IO pressure proportionally to the work done.
    Auto,
}

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for input files.
    pub input_dir: PathBuf,
    /// Process files in all child directories as well.
    pub recursive: bool,
    /// Pause between items.
    pub wait: WaitPolicy,
    /// Resolution limit; sources below it are left unscaled.
    pub target_height: u32,
    /// Frame rate limit; slower sources keep their native rate.
    pub target_fps: u32,
    /// Encoder preset override (codec-specific default when None).
    pub speed: Option<String>,
    pub audio_codec: AudioCodec,
    pub video_codec: VideoCodec,
    /// Audio bitrate in kbps (codec-specific default when None).
    pub audio_quality: Option<u32>,
    /// Video CRF (codec-specific default when None).
    pub video_quality: Option<u32>,
    /// ffmpeg binary, resolved via PATH.
    pub ffmpeg_bin: String,
    /// ffprobe binary, resolved via PATH.
    pub ffprobe_bin: String,
}

impl BatchConfig {
    /// Creates a configuration with the defaults used by the CLI.
    #[must_use]
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            recursive: false,
            wait: WaitPolicy::Auto,
            target_height: 720,
            target_fps: 30,
            speed: None,
            audio_codec: AudioCodec::HeAac,
            video_codec: VideoCodec::Hevc,
            audio_quality: None,
            video_quality: None,
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }

    /// Validates the configuration before any file is touched.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_dir.is_dir() {
            return Err(CoreError::InvalidInputPath(format!(
                "'{}' is not a directory",
                self.input_dir.display()
            )));
        }
        Ok(())
    }

    /// Whether a video track is being encoded at all.
    #[must_use]
    pub fn video_enabled(&self) -> bool {
        self.video_codec != VideoCodec::Disabled
    }

    /// Extensions recognized for input files in the current mode (no dot,
    /// matched case-insensitively).
    #[must_use]
    pub fn input_extensions(&self) -> &'static [&'static str] {
        if self.video_enabled() {
            &["mp4", "avi", "mov", "mkv"]
        } else {
            &["flac", "m4a", "mp3", "mp4", "wav"]
        }
    }

    /// Extension of produced files (no dot).
    #[must_use]
    pub fn output_extension(&self) -> &'static str {
        if self.video_enabled() {
            "mp4"
        } else if self.audio_codec == AudioCodec::Opus {
            "opus"
        } else {
            "m4a"
        }
    }

    /// Output directory for this run, named after the output extension and
    /// nested in the input directory (e.g. `out-mp4`).
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.input_dir.join(format!("out-{}", self.output_extension()))
    }

    /// Path of the append-only run log, alongside the produced files.
    #[must_use]
    pub fn run_log_path(&self) -> PathBuf {
        let stem = self
            .input_dir
            .file_name()
            .map_or_else(|| "batch".to_string(), |n| n.to_string_lossy().to_string());
        self.output_dir().join(format!("{stem}.log"))
    }

    /// Computes the output path for one input file: the root-relative input
    /// path placed under the output directory, extension replaced.
    pub fn output_path_for(&self, input: &Path) -> CoreResult<PathBuf> {
        let rel = input.strip_prefix(&self.input_dir).map_err(|_| {
            CoreError::PathError(format!(
                "'{}' is not under input directory '{}'",
                input.display(),
                self.input_dir.display()
            ))
        })?;
        Ok(self
            .output_dir()
            .join(rel)
            .with_extension(self.output_extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_tables() {
        let mut config = BatchConfig::new(PathBuf::from("/tmp"));
        assert!(config.video_enabled());
        assert_eq!(config.output_extension(), "mp4");
        assert!(config.input_extensions().contains(&"mkv"));

        config.video_codec = VideoCodec::Disabled;
        assert!(!config.video_enabled());
        assert_eq!(config.output_extension(), "m4a");
        assert!(config.input_extensions().contains(&"flac"));

        config.audio_codec = AudioCodec::Opus;
        assert_eq!(config.output_extension(), "opus");
    }

    #[test]
    fn test_output_path_for() {
        let mut config = BatchConfig::new(PathBuf::from("/media/in"));
        config.recursive = true;
        let out = config
            .output_path_for(Path::new("/media/in/shows/ep1.mkv"))
            .unwrap();
        assert_eq!(out, PathBuf::from("/media/in/out-mp4/shows/ep1.mp4"));

        assert!(config.output_path_for(Path::new("/elsewhere/x.mkv")).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_dir() {
        let config = BatchConfig::new(PathBuf::from("surely/does/not/exist"));
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidInputPath(_))
        ));
    }
}
