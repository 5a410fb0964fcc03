//! Codec selection tables for ffmpeg argument assembly.
//!
//! Maps the enumerated audio/video codec choices to their ffmpeg argument
//! lists, with per-codec default bitrate/CRF/preset values that can be
//! overridden from the command line.

use crate::error::CoreError;
use std::str::FromStr;

/// Audio codec choices. `Copy` passes the source audio through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    /// AAC-LC via libfdk_aac
    Aac,
    /// HE-AAC (AAC-LC with SBR) via libfdk_aac
    HeAac,
    /// Opus via libopus
    Opus,
    /// Stream copy
    Copy,
}

impl FromStr for AudioCodec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aac" => Ok(AudioCodec::Aac),
            "he" => Ok(AudioCodec::HeAac),
            "opus" => Ok(AudioCodec::Opus),
            "ac" => Ok(AudioCodec::Copy),
            other => Err(CoreError::InvalidCodecSelection(format!(
                "unknown audio codec '{other}' (expected one of: aac, he, opus, ac)"
            ))),
        }
    }
}

impl AudioCodec {
    /// ffmpeg arguments for this audio codec. `quality` is a bitrate in kbps
    /// overriding the per-codec default.
    #[must_use]
    pub fn args(&self, quality: Option<u32>) -> Vec<String> {
        let bitrate = |default: &str| {
            quality.map_or_else(|| default.to_string(), |q| format!("{q}k"))
        };
        match self {
            AudioCodec::Copy => svec(&["-c:a", "copy"]),
            // fdk_aac defaults to a LPF cutoff around 14k
            // https://wiki.hydrogenaud.io/index.php?title=Fraunhofer_FDK_AAC#Bandwidth
            AudioCodec::Aac => vec![
                "-c:a".into(),
                "libfdk_aac".into(),
                "-b:a".into(),
                bitrate("72k"),
                "-afterburner".into(),
                "1".into(),
                "-cutoff".into(),
                "15500".into(),
                "-ar".into(),
                "32000".into(),
            ],
            // mono he-aac encodes are reported as stereo by ffmpeg/ffprobe
            // https://trac.ffmpeg.org/ticket/3361
            AudioCodec::HeAac => vec![
                "-c:a".into(),
                "libfdk_aac".into(),
                "-profile:a".into(),
                "aac_he".into(),
                "-b:a".into(),
                bitrate("56k"),
                "-afterburner".into(),
                "1".into(),
            ],
            AudioCodec::Opus => vec![
                "-c:a".into(),
                "libopus".into(),
                "-b:a".into(),
                bitrate("48k"),
                "-vbr".into(),
                "on".into(),
                "-compression_level".into(),
                "10".into(),
                "-frame_duration".into(),
                "20".into(),
            ],
        }
    }
}

/// Video codec choices. `Disabled` drops the video track (`-vn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCodec {
    /// AVC/H.264 via libx264
    Avc,
    /// HEVC/H.265 via libx265
    Hevc,
    /// AV1 via libsvtav1
    Av1,
    /// No video stream (audio-only mode)
    Disabled,
}

impl FromStr for VideoCodec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avc" => Ok(VideoCodec::Avc),
            "hevc" => Ok(VideoCodec::Hevc),
            "av1" => Ok(VideoCodec::Av1),
            "vn" => Ok(VideoCodec::Disabled),
            other => Err(CoreError::InvalidCodecSelection(format!(
                "unknown video codec '{other}' (expected one of: avc, hevc, av1, vn)"
            ))),
        }
    }
}

impl VideoCodec {
    /// ffmpeg arguments for this video codec. `quality` is a CRF value and
    /// `speed` a preset, each overriding the per-codec default.
    #[must_use]
    pub fn args(&self, quality: Option<u32>, speed: Option<&str>) -> Vec<String> {
        let crf = |default: &str| {
            quality.map_or_else(|| default.to_string(), |q| q.to_string())
        };
        let preset = |default: &str| speed.unwrap_or(default).to_string();
        match self {
            VideoCodec::Disabled => svec(&["-vn"]),
            VideoCodec::Avc => vec![
                "-c:v".into(),
                "libx264".into(),
                "-preset:v".into(),
                preset("slow"),
                "-crf".into(),
                crf("28"),
                "-profile:v".into(),
                "high".into(),
            ],
            VideoCodec::Hevc => vec![
                "-c:v".into(),
                "libx265".into(),
                "-preset:v".into(),
                preset("medium"),
                "-crf".into(),
                crf("32"),
            ],
            // -g 240: keyframe interval, roughly fps*10
            VideoCodec::Av1 => vec![
                "-c:v".into(),
                "libsvtav1".into(),
                "-crf".into(),
                crf("52"),
                "-preset:v".into(),
                preset("8"),
                "-g".into(),
                "240".into(),
            ],
        }
    }
}

/// Common video filter options: pixel format, vfr sync, target frame rate,
/// and an optional downscale. `height = None` emits no scale filter at all
/// (sources already below the target resolution are never upscaled).
#[must_use]
pub fn video_filter_opts(fps: &str, height: Option<u32>) -> Vec<String> {
    let mut opts = svec(&["-pix_fmt", "yuv420p", "-vsync", "vfr", "-r"]);
    opts.push(fps.to_string());
    if let Some(h) = height {
        opts.push("-vf".into());
        opts.push(format!("scale=-2:{h}"));
    }
    opts
}

fn svec(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| (*a).to_string()).collect()
}
