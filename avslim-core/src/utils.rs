//! Utility functions for formatting, parsing, and ordering.
//!
//! General-purpose helpers used throughout the avslim-core library:
//! duration/size formatting, rational frame-rate parsing, and the natural
//! ordering used to keep batch processing deterministic across restarts.

use std::cmp::Ordering;
use std::path::PathBuf;

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a byte count to megabytes (bytes / 2^20), rounded to 2 decimals.
#[must_use]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / f64::from(1u32 << 20))
}

/// Formats seconds as H:MM:SS truncated to whole seconds
/// (e.g., 3725.9 -> "1:02:05"). Returns "0:00:00" for invalid inputs.
#[must_use]
pub fn secs_to_hms(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "0:00:00".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Parses an ffprobe rational string (e.g. "30000/1001") or a plain number
/// into a float. Returns None for malformed input or a zero denominator.
#[must_use]
pub fn parse_rational(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 { None } else { Some(num / den) }
        }
        None => value.trim().parse::<f64>().ok(),
    }
}

/// Returns the current local timestamp formatted for file names
/// (e.g., "240601-123045").
#[must_use]
pub fn file_timestamp() -> String {
    chrono::Local::now().format("%y%m%d-%H%M%S").to_string()
}

/// Returns the current local time of day, whole seconds (e.g., "12:30:45").
#[must_use]
pub fn time_now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[derive(Debug, PartialEq, Eq)]
enum NaturalPiece {
    Number(u64),
    Text(String),
}

fn natural_key(value: &str) -> Vec<NaturalPiece> {
    let mut pieces = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();

    for ch in value.chars() {
        if ch.is_ascii_digit() {
            if !text.is_empty() {
                pieces.push(NaturalPiece::Text(std::mem::take(&mut text)));
            }
            digits.push(ch);
        } else {
            if !digits.is_empty() {
                let run = std::mem::take(&mut digits);
                // Overflowing runs fall back to text comparison
                match run.parse::<u64>() {
                    Ok(n) => pieces.push(NaturalPiece::Number(n)),
                    Err(_) => pieces.push(NaturalPiece::Text(run)),
                }
            }
            text.extend(ch.to_lowercase());
        }
    }
    if !digits.is_empty() {
        match digits.parse::<u64>() {
            Ok(n) => pieces.push(NaturalPiece::Number(n)),
            Err(_) => pieces.push(NaturalPiece::Text(digits)),
        }
    }
    if !text.is_empty() {
        pieces.push(NaturalPiece::Text(text));
    }
    pieces
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ka = natural_key(a);
    let kb = natural_key(b);
    for (pa, pb) in ka.iter().zip(kb.iter()) {
        let ord = match (pa, pb) {
            (NaturalPiece::Number(na), NaturalPiece::Number(nb)) => na.cmp(nb),
            (NaturalPiece::Text(ta), NaturalPiece::Text(tb)) => ta.cmp(tb),
            (NaturalPiece::Number(_), NaturalPiece::Text(_)) => Ordering::Less,
            (NaturalPiece::Text(_), NaturalPiece::Number(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ka.len().cmp(&kb.len())
}

/// Sorts paths into a stable natural order (digit runs compared numerically,
/// text case-insensitively) so skip/resume behavior and ETA reporting are
/// deterministic across restarts.
pub fn sort_natural(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
}
