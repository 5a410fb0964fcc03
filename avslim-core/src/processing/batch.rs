//! The sequential batch orchestration loop.
//!
//! Drives enumerate -> skip-check -> probe -> encode -> commit -> re-probe ->
//! verify -> report, one item at a time. Any probe or encode failure aborts
//! the remaining batch: a tool-level problem is assumed likely to recur on
//! every subsequent item. The shared temporary output path is scoped to this
//! loop by `ScratchGuard`, so it is cleaned up on every exit path.

use crate::codecs::video_filter_opts;
use crate::config::{BatchConfig, WaitPolicy};
use crate::discovery::find_media_files;
use crate::error::{CoreError, CoreResult};
use crate::external::{EncodeJob, Encoder, Prober};
use crate::logging::RunLog;
use crate::probe::{StreamParams, TrackKind, compare_durations, extract_stream_params};
use crate::scratch::ScratchGuard;
use crate::stats::BatchStats;
use crate::utils::{parse_rational, sort_natural, time_now};
use crate::EncodeOutcome;

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Factor dividing an item's encode time to derive the automatic
/// inter-item pause.
const AUTO_WAIT_DIVISOR: f64 = 7.5;

/// Processes the discovered files sequentially according to `config`.
///
/// Items whose output already exists are skipped (idempotent resume). The
/// first probe or encode failure aborts the run and propagates; items after
/// it are never attempted. Returns one `EncodeOutcome` per item actually
/// encoded.
pub fn process_files<P: Prober, E: Encoder>(
    prober: &P,
    encoder: &E,
    config: &BatchConfig,
    files: &[PathBuf],
    run_log: &mut RunLog,
) -> CoreResult<Vec<EncodeOutcome>> {
    let mut files: Vec<PathBuf> = files.to_vec();
    sort_natural(&mut files);

    let out_dir = config.output_dir();
    let out_ext = config.output_extension();

    // The guard owns the shared temp path for the whole loop; its Drop is
    // the cleanup guarantee for every exit path below.
    let scratch = ScratchGuard::new(&out_dir, out_ext)?;

    // Pre-scan the output directory once; items whose output is already
    // present are skipped without probing or encoding.
    let existing: HashSet<PathBuf> =
        find_media_files(&out_dir, &[out_ext], config.recursive, None)?
            .into_iter()
            .collect();

    let mut stats = BatchStats::new();
    let mut outcomes = Vec::new();
    let total = files.len();

    for (idx, input) in files.iter().enumerate() {
        let label = format!("{}/{}", idx + 1, total);
        let out_file = config.output_path_for(input)?;

        if existing.contains(&out_file) {
            status(run_log, "Skipping", &label, input);
            continue;
        }

        status(run_log, "Processing", &label, input);

        // Pre-encode probe; fatal for the whole batch on failure.
        let pre_doc = match prober.probe(input) {
            Ok(doc) => doc,
            Err(e) => return Err(fail(run_log, input, e)),
        };
        let audio_in = extract_stream_params(&pre_doc, TrackKind::Audio);
        let video_in = if config.video_enabled() {
            extract_stream_params(&pre_doc, TrackKind::Video)
        } else {
            StreamParams::default()
        };

        let filter_args = if config.video_enabled() {
            let (fps, height) = clamp_video_targets(config, &video_in);
            video_filter_opts(&fps, height)
        } else {
            Vec::new()
        };

        let job = EncodeJob::build(
            input,
            scratch.temp_path(),
            &config.video_codec.args(config.video_quality, config.speed.as_deref()),
            &filter_args,
            &config.audio_codec.args(config.audio_quality),
        );
        emit(run_log, &format!("\n{}", job.command_line(&config.ffmpeg_bin)));

        let started = Instant::now();
        let stdout = match encoder.encode(&job) {
            Ok(stdout) => stdout,
            Err(e) => return Err(fail(run_log, input, e)),
        };
        let elapsed = started.elapsed();
        if !stdout.trim().is_empty() {
            emit(run_log, &stdout);
        }

        scratch.commit(&out_file)?;
        status(run_log, "Processed", &label, input);

        // Re-probe the committed output and verify durations per track.
        let post_doc = match prober.probe(&out_file) {
            Ok(doc) => doc,
            Err(e) => return Err(fail(run_log, &out_file, e)),
        };

        if config.video_enabled() {
            let video_out = extract_stream_params(&post_doc, TrackKind::Video);
            emit(
                run_log,
                &format!(
                    "\nVideo Input:: {}\nVideo Output:: {}",
                    video_in.format(),
                    video_out.format()
                ),
            );
            if let Some(warning) = compare_durations(&video_in, &video_out, TrackKind::Video) {
                warn!("{warning}");
                run_log.line(&warning);
            }
        }

        let audio_out = extract_stream_params(&post_doc, TrackKind::Audio);
        emit(
            run_log,
            &format!(
                "\nAudio Input:: {}\nAudio Output:: {}",
                audio_in.format(),
                audio_out.format()
            ),
        );
        if let Some(warning) = compare_durations(&audio_in, &audio_out, TrackKind::Audio) {
            warn!("{warning}");
            run_log.line(&warning);
        }

        let input_size = std::fs::metadata(input)?.len();
        let output_size = std::fs::metadata(&out_file)?.len();
        let duration = audio_in
            .duration_secs()
            .or_else(|| video_in.duration_secs())
            .unwrap_or(0.0);

        stats.record(elapsed.as_secs_f64(), input_size, output_size, duration);
        emit(run_log, &stats.report(total - (idx + 1)));

        outcomes.push(EncodeOutcome {
            input: input.clone(),
            output: out_file,
            elapsed,
            input_size,
            output_size,
        });

        if idx + 1 < total {
            pause_between_items(config.wait, elapsed);
        }
    }

    Ok(outcomes)
}

/// Per-item resolution/frame-rate clamp.
///
/// Sources shorter than the target height get no scale filter at all (no
/// upscaling, native height kept); sources slower than the target frame
/// rate keep their native rational rate as the `-r` value.
fn clamp_video_targets(config: &BatchConfig, video_in: &StreamParams) -> (String, Option<u32>) {
    let mut height = Some(config.target_height);
    if let Some(src_height) = video_in.get("height").and_then(|h| h.parse::<u32>().ok()) {
        if src_height < config.target_height {
            height = None;
        }
    }

    let mut fps = config.target_fps.to_string();
    if let Some(raw) = video_in.get("r_frame_rate") {
        if let Some(src_fps) = parse_rational(raw) {
            if src_fps < f64::from(config.target_fps) {
                fps = raw.to_string();
            }
        }
    }

    (fps, height)
}

/// Blocking inter-item pause with a visible countdown. Interruptible only
/// by process termination.
fn pause_between_items(policy: WaitPolicy, last_elapsed: Duration) {
    let secs = match policy {
        WaitPolicy::Fixed(secs) => secs,
        WaitPolicy::Auto => (last_elapsed.as_secs_f64() / AUTO_WAIT_DIVISOR).round() as u64,
    };
    if secs == 0 {
        return;
    }

    info!("Waiting {secs} seconds before the next file...");
    let bar = ProgressBar::new(secs);
    if let Ok(style) = ProgressStyle::with_template("{msg} {bar:30} {pos}/{len}s") {
        bar.set_style(style);
    }
    bar.set_message("Waiting");
    for _ in 0..secs {
        std::thread::sleep(Duration::from_secs(1));
        bar.inc(1);
    }
    bar.finish_and_clear();
}

/// One status line for an item, mirrored to console and run log.
fn status(run_log: &mut RunLog, what: &str, label: &str, file: &Path) {
    let name = file
        .file_name()
        .map_or_else(|| file.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned());
    emit(
        run_log,
        &format!("\n----------------\n{what} file {label}: {name} at {}", time_now()),
    );
}

fn emit(run_log: &mut RunLog, msg: &str) {
    info!("{msg}");
    run_log.line(msg);
}

/// Logs a batch-fatal failure before propagating it.
fn fail(run_log: &mut RunLog, file: &Path, err: CoreError) -> CoreError {
    let msg = format!(
        "\n------\nERROR: Something went wrong while processing the following file.\n > {}\n{err}",
        file.display()
    );
    error!("{msg}");
    run_log.line(&msg);
    err
}
