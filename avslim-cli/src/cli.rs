// avslim-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use avslim_core::{AudioCodec, VideoCodec};
use clap::Parser;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Optimize video/audio files by encoding to avc/hevc/av1/aac/opus",
    long_about = "Walks a directory for media files and re-encodes each one with \
                  ffmpeg, skipping files already processed in a previous run."
)]
pub struct Cli {
    /// Directory containing the files to process
    #[arg(short = 'd', long = "dir", required = true, value_name = "DIR", value_parser = parse_dir)]
    pub dir: PathBuf,

    /// Process files recursively in all child directories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Wait time in seconds between each file; without a value waits 10
    /// seconds, without the flag the wait is derived from encode time
    #[arg(short = 'w', long, value_name = "SECONDS", num_args = 0..=1, default_missing_value = "10")]
    pub wait: Option<u64>,

    /// Limit video resolution; can be 480, 540, 720, etc.
    #[arg(long = "res", default_value_t = 720, value_name = "HEIGHT")]
    pub res: u32,

    /// Limit video frame rate; can be 24, 25, 30, 60, etc.
    #[arg(long = "fps", default_value_t = 30, value_name = "FPS")]
    pub fps: u32,

    /// Video encoding speed; avc & hevc: slow, medium, fast etc.;
    /// av1: 0-13 (lower is slower and more efficient)
    #[arg(short = 's', long, value_name = "PRESET")]
    pub speed: Option<String>,

    /// Audio codec: AAC-LC "aac", HE-AAC "he", Opus "opus", or copy "ac"
    #[arg(long = "audio-codec", alias = "ca", default_value = "he", value_name = "CODEC", value_parser = parse_audio_codec)]
    pub audio_codec: AudioCodec,

    /// Video codec: AVC/H264 "avc", HEVC/H265 "hevc", AV1 "av1", or
    /// audio-only "vn"
    #[arg(long = "video-codec", alias = "cv", default_value = "hevc", value_name = "CODEC", value_parser = parse_video_codec)]
    pub video_codec: VideoCodec,

    /// Video quality (CRF); avc: 17-28, hevc: 20-32, av1: 0-63; lower
    /// means less compression
    #[arg(long = "video-quality", alias = "qv", value_name = "CRF")]
    pub video_quality: Option<u32>,

    /// Audio quality/bitrate in kbps
    #[arg(long = "audio-quality", alias = "qa", value_name = "KBPS")]
    pub audio_quality: Option<u32>,
}

fn parse_dir(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err("Invalid directory path".to_string())
    }
}

fn parse_audio_codec(value: &str) -> Result<AudioCodec, String> {
    value.parse().map_err(|e: avslim_core::CoreError| e.to_string())
}

fn parse_video_codec(value: &str) -> Result<VideoCodec, String> {
    value.parse().map_err(|e: avslim_core::CoreError| e.to_string())
}
