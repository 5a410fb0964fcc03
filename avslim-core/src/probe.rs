//! Stream metadata extraction from ffprobe JSON.
//!
//! Only the first two streams of a file are inspected, matching the common
//! single-video + single-audio layout. Fields absent from a stream's native
//! description are filled with the `"N/A"` sentinel so downstream formatting
//! and comparisons never have to special-case missing keys.

use crate::utils::round2;
use serde_json::Value;

/// Placeholder for fields the source stream does not report.
pub const SENTINEL: &str = "N/A";

/// Seconds of source/output duration drift tolerated before warning.
const DURATION_WARN_SECS: f64 = 1.0;

const BASIC_FIELDS: [&str; 5] = ["codec_type", "codec_name", "profile", "duration", "bit_rate"];
const AUDIO_FIELDS: [&str; 2] = ["channels", "sample_rate"];
const VIDEO_FIELDS: [&str; 2] = ["height", "r_frame_rate"];

/// Track type to extract metadata for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
        }
    }

    fn extra_fields(&self) -> &'static [&'static str] {
        match self {
            TrackKind::Audio => &AUDIO_FIELDS,
            TrackKind::Video => &VIDEO_FIELDS,
        }
    }
}

/// Ordered field-name to string-value mapping for one stream.
///
/// Empty when no stream of the requested type exists among the first two
/// streams; that is not an error, it surfaces downstream as missing fields.
#[derive(Debug, Clone, Default)]
pub struct StreamParams {
    entries: Vec<(&'static str, String)>,
}

impl StreamParams {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a field by name. Absent fields present as the sentinel.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the stream duration, if present and numeric.
    #[must_use]
    pub fn duration_secs(&self) -> Option<f64> {
        self.get("duration").and_then(|d| d.parse::<f64>().ok())
    }

    /// Renders all fields in insertion order as `key: value; ` pairs.
    #[must_use]
    pub fn format(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}: {v}; "))
            .collect()
    }
}

/// Extracts the fixed field set for the first stream of the requested type
/// among the first two streams of the probed document.
#[must_use]
pub fn extract_stream_params(doc: &Value, kind: TrackKind) -> StreamParams {
    let streams = match doc.get("streams").and_then(Value::as_array) {
        Some(streams) => streams,
        None => return StreamParams::default(),
    };

    for stream in streams.iter().take(2) {
        if stream.get("codec_type").and_then(Value::as_str) != Some(kind.as_str()) {
            continue;
        }

        let mut entries = Vec::with_capacity(BASIC_FIELDS.len() + kind.extra_fields().len());
        for key in BASIC_FIELDS.iter().chain(kind.extra_fields()) {
            entries.push((*key, field_value(stream, key)));
        }
        let mut params = StreamParams { entries };
        convert_bit_rate(&mut params);
        return params;
    }

    StreamParams::default()
}

/// Scalar field lookup with sentinel substitution.
fn field_value(stream: &Value, key: &str) -> String {
    match stream.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => SENTINEL.to_string(),
    }
}

/// Converts `bit_rate` from bits/sec to a rounded kbps string when numeric;
/// non-numeric values (the sentinel included) are left as-is.
fn convert_bit_rate(params: &mut StreamParams) {
    if let Some(entry) = params.entries.iter_mut().find(|(k, _)| *k == "bit_rate") {
        if let Ok(bits) = entry.1.parse::<f64>() {
            entry.1 = round2(bits / 1000.0).to_string();
        }
    }
}

/// Compares source and output durations for one track type. Returns a
/// warning message when the absolute difference exceeds one second; this is
/// a soft correctness signal, never a hard failure.
#[must_use]
pub fn compare_durations(source: &StreamParams, output: &StreamParams, kind: TrackKind) -> Option<String> {
    let src = source.duration_secs()?;
    let out = output.duration_secs()?;
    let diff = (src - out).abs();
    if diff > DURATION_WARN_SECS {
        Some(format!(
            "WARNING: Difference between {} source and output durations ({} seconds) \
             is more than {} second(s).",
            kind.as_str(),
            round2(diff),
            DURATION_WARN_SECS
        ))
    } else {
        None
    }
}
