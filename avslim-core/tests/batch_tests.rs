// avslim-core/tests/batch_tests.rs
//
// Orchestration loop behavior with mock prober/encoder implementations:
// skip/resume semantics, fail-fast aborts, scratch cleanup, clamping.

use avslim_core::config::{BatchConfig, WaitPolicy};
use avslim_core::error::CoreError;
use avslim_core::external::{EncodeJob, Encoder, Prober};
use avslim_core::logging::RunLog;
use avslim_core::processing::process_files;
use avslim_core::{find_media_files, VideoCodec};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct MockProber {
    calls: RefCell<Vec<PathBuf>>,
    doc: Value,
    fail_name: Option<String>,
}

impl MockProber {
    fn new(doc: Value) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            doc,
            fail_name: None,
        }
    }

    fn failing_on(doc: Value, name: &str) -> Self {
        Self {
            fail_name: Some(name.to_string()),
            ..Self::new(doc)
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Prober for MockProber {
    fn probe(&self, file: &Path) -> avslim_core::CoreResult<Value> {
        self.calls.borrow_mut().push(file.to_path_buf());
        if let Some(fail_name) = &self.fail_name {
            if file.file_name().is_some_and(|n| n.to_string_lossy() == *fail_name) {
                return Err(CoreError::Probe {
                    code: Some(1),
                    stderr: "mock probe failure".to_string(),
                });
            }
        }
        Ok(self.doc.clone())
    }
}

struct MockEncoder {
    calls: RefCell<Vec<Vec<String>>>,
    fail_on_call: Option<usize>,
}

impl MockEncoder {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on_call: None,
        }
    }

    fn failing_on_call(n: usize) -> Self {
        Self {
            fail_on_call: Some(n),
            ..Self::new()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn call_args(&self, n: usize) -> Vec<String> {
        self.calls.borrow()[n].clone()
    }
}

impl Encoder for MockEncoder {
    fn encode(&self, job: &EncodeJob) -> avslim_core::CoreResult<String> {
        let call_index = self.call_count();
        self.calls.borrow_mut().push(job.args().to_vec());

        // The output path is the final argument; write it like ffmpeg would,
        // even when the invocation is about to "fail" mid-encode.
        let output = PathBuf::from(job.args().last().expect("job has an output path"));
        fs::write(&output, b"encoded").expect("mock encoder writes output");

        if self.fail_on_call == Some(call_index) {
            return Err(CoreError::Encode {
                code: Some(1),
                stderr: "mock encode failure".to_string(),
            });
        }
        Ok(String::new())
    }
}

fn stream_doc(height: u64, frame_rate: &str) -> Value {
    json!({
        "streams": [
            {
                "codec_type": "video",
                "codec_name": "h264",
                "duration": "60.0",
                "bit_rate": "2500000",
                "height": height,
                "r_frame_rate": frame_rate
            },
            {
                "codec_type": "audio",
                "codec_name": "aac",
                "duration": "60.0",
                "bit_rate": "128000",
                "channels": 2,
                "sample_rate": "44100"
            }
        ]
    })
}

fn test_config(input_dir: &Path) -> BatchConfig {
    let mut config = BatchConfig::new(input_dir.to_path_buf());
    config.wait = WaitPolicy::Fixed(0);
    config
}

fn write_input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![0u8; 4096]).unwrap();
    path
}

fn discover(config: &BatchConfig) -> Vec<PathBuf> {
    find_media_files(
        &config.input_dir,
        config.input_extensions(),
        config.recursive,
        Some(&config.output_dir()),
    )
    .unwrap()
}

fn no_temp_files(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(entries) => !entries
            .filter_map(Result::ok)
            .any(|e| e.file_name().to_string_lossy().starts_with("tmp-")),
        Err(_) => true,
    }
}

#[test]
fn test_successful_batch_in_natural_order() {
    let dir = tempdir().unwrap();
    write_input(dir.path(), "ep10.mp4");
    write_input(dir.path(), "ep2.mp4");

    let config = test_config(dir.path());
    let prober = MockProber::new(stream_doc(1080, "30/1"));
    let encoder = MockEncoder::new();
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let files = discover(&config);
    let outcomes = process_files(&prober, &encoder, &config, &files, &mut run_log).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].input.ends_with("ep2.mp4"));
    assert!(outcomes[1].input.ends_with("ep10.mp4"));
    assert!(config.output_dir().join("ep2.mp4").is_file());
    assert!(config.output_dir().join("ep10.mp4").is_file());
    // pre- and post-probe per item
    assert_eq!(prober.call_count(), 4);
    assert!(no_temp_files(&config.output_dir()));

    let log = fs::read_to_string(config.run_log_path()).unwrap();
    assert!(log.contains("Processing file 1/2"));
    assert!(log.contains("Total Size Reduction"));
}

#[test]
fn test_idempotent_resume_skips_everything() {
    let dir = tempdir().unwrap();
    write_input(dir.path(), "a.mp4");
    write_input(dir.path(), "b.mp4");

    let config = test_config(dir.path());
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let first = MockProber::new(stream_doc(1080, "30/1"));
    let files = discover(&config);
    let outcomes = process_files(&first, &MockEncoder::new(), &config, &files, &mut run_log).unwrap();
    assert_eq!(outcomes.len(), 2);

    // Second run over the same inputs: everything skipped, nothing probed
    // or encoded, no new outputs.
    let second_prober = MockProber::new(stream_doc(1080, "30/1"));
    let second_encoder = MockEncoder::new();
    let files = discover(&config);
    let outcomes =
        process_files(&second_prober, &second_encoder, &config, &files, &mut run_log).unwrap();
    assert!(outcomes.is_empty());
    assert_eq!(second_prober.call_count(), 0);
    assert_eq!(second_encoder.call_count(), 0);

    let produced: Vec<_> = fs::read_dir(config.output_dir())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "mp4"))
        .collect();
    assert_eq!(produced.len(), 2);
}

#[test]
fn test_encode_failure_aborts_remaining_items() {
    let dir = tempdir().unwrap();
    write_input(dir.path(), "f1.mp4");
    write_input(dir.path(), "f2.mp4");
    write_input(dir.path(), "f3.mp4");

    let config = test_config(dir.path());
    let prober = MockProber::new(stream_doc(1080, "30/1"));
    let encoder = MockEncoder::failing_on_call(0);
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let files = discover(&config);
    let result = process_files(&prober, &encoder, &config, &files, &mut run_log);
    assert!(matches!(result, Err(CoreError::Encode { .. })));

    // Only the first item was attempted: one pre-probe, one encode.
    assert_eq!(prober.call_count(), 1);
    assert_eq!(encoder.call_count(), 1);
    // Nothing was committed and the partial temp artifact was cleaned up.
    assert!(!config.output_dir().join("f1.mp4").exists());
    assert!(no_temp_files(&config.output_dir()));
}

#[test]
fn test_probe_failure_aborts_before_encoding() {
    let dir = tempdir().unwrap();
    write_input(dir.path(), "f1.mp4");
    write_input(dir.path(), "f2.mp4");

    let config = test_config(dir.path());
    let prober = MockProber::failing_on(stream_doc(1080, "30/1"), "f1.mp4");
    let encoder = MockEncoder::new();
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let files = discover(&config);
    let result = process_files(&prober, &encoder, &config, &files, &mut run_log);
    assert!(matches!(result, Err(CoreError::Probe { .. })));
    assert_eq!(encoder.call_count(), 0);

    let log = fs::read_to_string(config.run_log_path()).unwrap();
    assert!(log.contains("ERROR"));
    assert!(log.contains("f1.mp4"));
}

#[test]
fn test_clamp_disables_upscale_and_keeps_native_frame_rate() {
    let dir = tempdir().unwrap();
    write_input(dir.path(), "low.mp4");

    let config = test_config(dir.path());
    // 480p source below the 720 target; 23.976 fps below the 30 target.
    let prober = MockProber::new(stream_doc(480, "24000/1001"));
    let encoder = MockEncoder::new();
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let files = discover(&config);
    process_files(&prober, &encoder, &config, &files, &mut run_log).unwrap();

    let args = encoder.call_args(0);
    assert!(!args.iter().any(|a| a.contains("scale=")));
    let r_pos = args.iter().position(|a| a == "-r").unwrap();
    assert_eq!(args[r_pos + 1], "24000/1001");
}

#[test]
fn test_clamp_applies_targets_to_larger_sources() {
    let dir = tempdir().unwrap();
    write_input(dir.path(), "big.mp4");

    let config = test_config(dir.path());
    let prober = MockProber::new(stream_doc(2160, "60/1"));
    let encoder = MockEncoder::new();
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let files = discover(&config);
    process_files(&prober, &encoder, &config, &files, &mut run_log).unwrap();

    let args = encoder.call_args(0);
    assert!(args.contains(&"scale=-2:720".to_string()));
    let r_pos = args.iter().position(|a| a == "-r").unwrap();
    assert_eq!(args[r_pos + 1], "30");
}

#[test]
fn test_audio_only_mode_drops_video() {
    let dir = tempdir().unwrap();
    write_input(dir.path(), "song.mp3");

    let mut config = test_config(dir.path());
    config.video_codec = VideoCodec::Disabled;

    let prober = MockProber::new(json!({
        "streams": [
            { "codec_type": "audio", "codec_name": "mp3", "duration": "180.0",
              "bit_rate": "320000", "channels": 2, "sample_rate": "44100" }
        ]
    }));
    let encoder = MockEncoder::new();
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let files = discover(&config);
    let outcomes = process_files(&prober, &encoder, &config, &files, &mut run_log).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].output.ends_with("out-m4a/song.m4a"));
    let args = encoder.call_args(0);
    assert!(args.contains(&"-vn".to_string()));
    assert!(!args.contains(&"-pix_fmt".to_string()));
}

#[test]
fn test_recursive_outputs_mirror_input_tree() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("season1");
    fs::create_dir(&nested).unwrap();
    write_input(&nested, "ep1.mkv");

    let mut config = test_config(dir.path());
    config.recursive = true;

    let prober = MockProber::new(stream_doc(1080, "30/1"));
    let encoder = MockEncoder::new();
    let mut run_log = RunLog::create(&config.run_log_path()).unwrap();

    let files = discover(&config);
    let outcomes = process_files(&prober, &encoder, &config, &files, &mut run_log).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(config.output_dir().join("season1").join("ep1.mp4").is_file());
}
