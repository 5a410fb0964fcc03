// avslim-cli/src/main.rs
//
// Command-line entry point for the avslim batch transcoding tool.
//
// Responsibilities:
// - Parsing and validating command-line arguments (directory, codecs,
//   quality/resolution/frame-rate limits, wait policy).
// - Setting up console logging and the per-run append-only log file.
// - Discovering the files to process and checking tool dependencies.
// - Invoking the core batch loop (`avslim_core::process_files`).
// - Displaying a summary and mapping failures to the process exit code.

mod cli;

use avslim_core::external::{FfmpegEncoder, FfprobeProber};
use avslim_core::{
    BatchConfig, CoreResult, EncodeOutcome, RunLog, WaitPolicy, check_dependency,
    find_media_files, process_files,
};
use cli::Cli;
use clap::Parser;
use console::style;
use log::error;
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn build_config(cli: Cli) -> BatchConfig {
    let mut config = BatchConfig::new(cli.dir);
    config.recursive = cli.recursive;
    config.wait = match cli.wait {
        Some(secs) => WaitPolicy::Fixed(secs),
        None => WaitPolicy::Auto,
    };
    config.target_height = cli.res;
    config.target_fps = cli.fps;
    config.speed = cli.speed;
    config.audio_codec = cli.audio_codec;
    config.video_codec = cli.video_codec;
    config.audio_quality = cli.audio_quality;
    config.video_quality = cli.video_quality;
    config
}

fn run(cli: Cli) -> CoreResult<()> {
    let mut config = build_config(cli);
    config.input_dir = config.input_dir.canonicalize()?;
    config.validate()?;

    let files = find_media_files(
        &config.input_dir,
        config.input_extensions(),
        config.recursive,
        Some(&config.output_dir()),
    )?;
    if files.is_empty() {
        println!("Nothing to do.");
        return Ok(());
    }

    check_dependency(&config.ffprobe_bin)?;
    check_dependency(&config.ffmpeg_bin)?;

    let mut run_log = RunLog::create(&config.run_log_path())?;
    let banner = format!(
        "\n=======================\nProcessing started at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{banner}");
    run_log.line(&banner);

    let total = files.len();
    let batch_start = Instant::now();
    let outcomes = process_files(
        &FfprobeProber::new(config.ffprobe_bin.clone()),
        &FfmpegEncoder::new(config.ffmpeg_bin.clone()),
        &config,
        &files,
        &mut run_log,
    )?;

    print_summary(&outcomes, total, batch_start.elapsed().as_secs_f64());
    Ok(())
}

fn print_summary(outcomes: &[EncodeOutcome], total: usize, elapsed_secs: f64) {
    let skipped = total - outcomes.len();
    let input_bytes: u64 = outcomes.iter().map(|o| o.input_size).sum();
    let output_bytes: u64 = outcomes.iter().map(|o| o.output_size).sum();
    let saved_mb = avslim_core::utils::bytes_to_mb(input_bytes.saturating_sub(output_bytes));

    println!();
    println!("{}", style("Batch complete.").green().bold());
    println!(
        "  {} encoded, {} skipped, {} total",
        style(outcomes.len()).cyan(),
        style(skipped).cyan(),
        style(total).cyan()
    );
    if !outcomes.is_empty() {
        println!(
            "  Saved {} MB in {}",
            style(saved_mb).cyan(),
            style(avslim_core::utils::secs_to_hms(elapsed_secs)).cyan()
        );
    }
}
