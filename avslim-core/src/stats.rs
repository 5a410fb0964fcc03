//! Running batch statistics.
//!
//! Accumulates per-item encode time, input/output sizes, and media durations
//! across the run, and renders the running totals, means, size reduction,
//! processing speed, and ETA after each completed item. Owned exclusively by
//! the orchestrator; never persisted.

use crate::utils::{bytes_to_mb, round2, secs_to_hms};

/// One completed item as fed to the ledger.
#[derive(Debug, Clone, Copy)]
struct Entry {
    elapsed_secs: f64,
    input_bytes: u64,
    output_bytes: u64,
    duration_secs: f64,
}

/// Accumulator of per-item figures for the whole run.
#[derive(Debug, Default)]
pub struct BatchStats {
    entries: Vec<Entry>,
}

impl BatchStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one successfully completed item.
    pub fn record(&mut self, elapsed_secs: f64, input_bytes: u64, output_bytes: u64, duration_secs: f64) {
        self.entries.push(Entry {
            elapsed_secs,
            input_bytes,
            output_bytes,
            duration_secs,
        });
    }

    /// Number of items completed so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn total_elapsed_secs(&self) -> f64 {
        self.entries.iter().map(|e| e.elapsed_secs).sum()
    }

    #[must_use]
    pub fn mean_elapsed_secs(&self) -> f64 {
        mean(self.entries.iter().map(|e| e.elapsed_secs))
    }

    #[must_use]
    pub fn total_input_mb(&self) -> f64 {
        round2(self.entries.iter().map(|e| bytes_to_mb(e.input_bytes)).sum())
    }

    #[must_use]
    pub fn mean_input_mb(&self) -> f64 {
        round2(mean(self.entries.iter().map(|e| bytes_to_mb(e.input_bytes))))
    }

    #[must_use]
    pub fn total_output_mb(&self) -> f64 {
        round2(self.entries.iter().map(|e| bytes_to_mb(e.output_bytes)).sum())
    }

    #[must_use]
    pub fn mean_output_mb(&self) -> f64 {
        round2(mean(self.entries.iter().map(|e| bytes_to_mb(e.output_bytes))))
    }

    /// Size reduction percentage over summed sizes: `(in - out) / in * 100`.
    #[must_use]
    pub fn reduction_by_sum(&self) -> Option<f64> {
        percent_reduction(self.total_input_mb(), self.total_output_mb())
    }

    /// Size reduction percentage over mean sizes.
    #[must_use]
    pub fn reduction_by_mean(&self) -> Option<f64> {
        percent_reduction(self.mean_input_mb(), self.mean_output_mb())
    }

    /// Mean processing speed: media-seconds encoded per elapsed second.
    #[must_use]
    pub fn average_speed(&self) -> Option<f64> {
        let elapsed = self.mean_elapsed_secs();
        if elapsed > 0.0 {
            Some(round2(mean(self.entries.iter().map(|e| e.duration_secs)) / elapsed))
        } else {
            None
        }
    }

    /// Estimated remaining time: mean elapsed time times remaining items.
    #[must_use]
    pub fn eta_secs(&self, remaining: usize) -> f64 {
        self.mean_elapsed_secs() * remaining as f64
    }

    /// Formats the per-item and running summary block for the most recently
    /// recorded item. Zero or empty denominators render placeholders rather
    /// than faulting.
    #[must_use]
    pub fn report(&self, remaining: usize) -> String {
        let last = match self.entries.last() {
            Some(last) => last,
            None => return String::new(),
        };

        let item_speed = if last.elapsed_secs > 0.0 {
            format!("x{}", round2(last.duration_secs / last.elapsed_secs))
        } else {
            "x--".to_string()
        };
        let avg_speed = self
            .average_speed()
            .map_or_else(|| "x--".to_string(), |s| format!("x{s}"));
        let reduction = |r: Option<f64>| {
            r.map_or_else(|| "--%".to_string(), |v| format!("{}%", round2(v)))
        };

        format!(
            "\nInput file size: {} MB, Output file size: {} MB\n\
             Processed {} in: {}, Processing Speed: {}\n\
             Total Input Size: {} MB, Average Input Size: {} MB\n\
             Total Output Size: {} MB, Average Output Size: {} MB\n\
             Total Size Reduction: {}, Average Size Reduction: {}\n\
             Total Processing Time: {}, Average Processing Time: {}\n\
             Estimated time: {}, Average Speed: {}",
            bytes_to_mb(last.input_bytes),
            bytes_to_mb(last.output_bytes),
            secs_to_hms(last.duration_secs),
            secs_to_hms(last.elapsed_secs),
            item_speed,
            self.total_input_mb(),
            self.mean_input_mb(),
            self.total_output_mb(),
            self.mean_output_mb(),
            reduction(self.reduction_by_sum()),
            reduction(self.reduction_by_mean()),
            secs_to_hms(self.total_elapsed_secs()),
            secs_to_hms(self.mean_elapsed_secs()),
            secs_to_hms(self.eta_secs(remaining)),
            avg_speed,
        )
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn percent_reduction(input: f64, output: f64) -> Option<f64> {
    if input > 0.0 {
        Some(round2((input - output) / input * 100.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1 << 20;

    #[test]
    fn test_running_arithmetic() {
        let mut stats = BatchStats::new();
        stats.record(2.0, 100 * MB, 50 * MB, 60.0);
        stats.record(4.0, 200 * MB, 100 * MB, 120.0);

        assert_eq!(stats.completed(), 2);
        assert_eq!(stats.mean_input_mb(), 150.0);
        assert_eq!(stats.mean_output_mb(), 75.0);
        assert_eq!(stats.reduction_by_mean(), Some(50.0));
        assert_eq!(stats.reduction_by_sum(), Some(50.0));
        assert_eq!(stats.total_elapsed_secs(), 6.0);
        // 180 media-seconds over 6 elapsed seconds
        assert_eq!(stats.average_speed(), Some(30.0));
        assert_eq!(stats.eta_secs(3), 9.0);
    }

    #[test]
    fn test_report_contents() {
        let mut stats = BatchStats::new();
        stats.record(2.0, 100 * MB, 50 * MB, 60.0);
        let report = stats.report(1);
        assert!(report.contains("Input file size: 100 MB"));
        assert!(report.contains("Output file size: 50 MB"));
        assert!(report.contains("Processing Speed: x30"));
        assert!(report.contains("Total Size Reduction: 50%"));
        assert!(report.contains("Estimated time: 0:00:02"));
    }

    #[test]
    fn test_zero_denominators_do_not_fault() {
        let stats = BatchStats::new();
        assert_eq!(stats.report(5), "");
        assert_eq!(stats.average_speed(), None);
        assert_eq!(stats.reduction_by_sum(), None);
        assert_eq!(stats.eta_secs(5), 0.0);

        let mut stats = BatchStats::new();
        stats.record(0.0, 0, 0, 0.0);
        let report = stats.report(0);
        assert!(report.contains("Processing Speed: x--"));
        assert!(report.contains("Total Size Reduction: --%"));
    }
}
