use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn avslim_cmd() -> Command {
    Command::cargo_bin("avslim").expect("Failed to find avslim binary")
}

#[test]
fn test_missing_dir_flag_fails() {
    avslim_cmd().assert().failure();
}

#[test]
fn test_invalid_directory_fails_before_processing() {
    let mut cmd = avslim_cmd();
    cmd.arg("--dir").arg("surely/this/does/not/exist");
    cmd.assert()
        .failure()
        .stderr(contains("Invalid directory path"));
}

#[test]
fn test_invalid_audio_codec_fails_parsing() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let mut cmd = avslim_cmd();
    cmd.arg("--dir")
        .arg(dir.path())
        .arg("--audio-codec")
        .arg("mp3");
    cmd.assert()
        .failure()
        .stderr(contains("unknown audio codec"));
    Ok(())
}

#[test]
fn test_invalid_video_codec_fails_parsing() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let mut cmd = avslim_cmd();
    cmd.arg("--dir")
        .arg(dir.path())
        .arg("--video-codec")
        .arg("vp9");
    cmd.assert()
        .failure()
        .stderr(contains("unknown video codec"));
    Ok(())
}

#[test]
fn test_empty_directory_is_nothing_to_do() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    std::fs::write(dir.path().join("notes.txt"), "not media")?;

    let mut cmd = avslim_cmd();
    cmd.arg("--dir").arg(dir.path());
    cmd.assert().success().stdout(contains("Nothing to do."));

    // No output directory or log file is created for an empty run.
    assert!(!dir.path().join("out-mp4").exists());
    Ok(())
}
