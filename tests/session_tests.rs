// Integration tests for the transcription session orchestrator.
//
// These cover the session invariants: upload preconditions, state clearing
// when a new source is selected, and the refusal of concurrent operations.

use anyhow::Result;
use async_trait::async_trait;
use echonote::results::PLACEHOLDER_SUMMARY;
use echonote::{
    AudioFrame, CaptureBackend, Config, DiarizationSegment, PlaceholderSummarizer, RecorderState,
    SessionError, TranscriptionResult, TranscriptionSession, UploadProgress,
};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

struct ChannelBackend {
    rx: Option<mpsc::Receiver<AudioFrame>>,
    capturing: bool,
}

impl ChannelBackend {
    fn new() -> (Self, mpsc::Sender<AudioFrame>) {
        let (tx, rx) = mpsc::channel(64);
        (
            Self {
                rx: Some(rx),
                capturing: false,
            },
            tx,
        )
    }
}

#[async_trait]
impl CaptureBackend for ChannelBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        self.capturing = true;
        Ok(self.rx.take().expect("backend started twice"))
    }

    async fn stop(&mut self) -> Result<()> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "channel"
    }
}

fn sample_result() -> TranscriptionResult {
    TranscriptionResult {
        transcription: "hello".to_string(),
        summary: Some("a summary".to_string()),
        diarization: vec![DiarizationSegment {
            speaker: "A".to_string(),
            time_range: "0-5".to_string(),
            text: "hi".to_string(),
        }],
        key_points: Some(vec!["one".to_string()]),
    }
}

/// Write a small valid WAV file the session can select.
fn write_test_wav(dir: &TempDir, name: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(&path, spec)?;
    for sample in [0i16, 100, -100, 50] {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(path)
}

#[tokio::test]
async fn test_transcribe_without_source_fails_before_any_network_call() {
    // Backend URL points nowhere; the precondition must fail first
    let mut config = Config::default();
    config.backend.base_url = "http://192.0.2.1:1".to_string();

    let mut session = TranscriptionSession::new(config);
    let err = session.transcribe().await.expect_err("must fail");

    assert!(matches!(err, SessionError::NoFileSelected));
    assert_eq!(session.upload_progress(), UploadProgress::default());
}

#[tokio::test]
async fn test_selecting_new_file_clears_previous_result_state() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let first = write_test_wav(&temp_dir, "first.wav")?;
    let second = write_test_wav(&temp_dir, "second.wav")?;

    let mut session = TranscriptionSession::new(Config::default());
    session.select_file(&first)?;

    // Simulate a completed upload
    session.presenter_mut().present(sample_result());
    assert!(session.presenter().result().is_some());

    session.select_file(&second)?;

    assert!(session.presenter().result().is_none());
    assert_eq!(session.upload_progress(), UploadProgress::default());
    assert_eq!(session.source().unwrap().name, "second.wav");

    Ok(())
}

#[tokio::test]
async fn test_upload_failure_reports_upload_failed_and_clears_results() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_test_wav(&temp_dir, "audio.wav")?;

    // Nothing listens here; the connection is refused immediately
    let mut config = Config::default();
    config.backend.base_url = "http://127.0.0.1:1".to_string();

    let mut session = TranscriptionSession::new(config);
    session.select_file(&file)?;

    // Stale result from an earlier upload must not survive the failure
    session.presenter_mut().present(sample_result());

    let err = session.transcribe().await.expect_err("must fail");

    assert!(matches!(err, SessionError::UploadFailed));
    assert!(session.presenter().result().is_none());
    assert!(!session.upload_progress().in_flight);

    // The session stays usable: the source is still selected
    assert_eq!(session.source().unwrap().name, "audio.wav");

    Ok(())
}

#[tokio::test]
async fn test_selecting_missing_file_reports_no_file_selected() {
    let mut session = TranscriptionSession::new(Config::default());

    let err = session
        .select_file("/nonexistent/audio.wav")
        .expect_err("must fail");

    assert!(matches!(err, SessionError::NoFileSelected));
}

#[tokio::test]
async fn test_stopping_a_recording_installs_it_as_the_active_source() -> Result<()> {
    let mut session = TranscriptionSession::new(Config::default());
    let (backend, tx) = ChannelBackend::new();

    session.start_recording_with(Box::new(backend)).await?;
    assert_eq!(session.recorder_state(), RecorderState::Recording);

    tx.send(AudioFrame {
        samples: vec![1, 2, 3],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: 0,
    })
    .await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    drop(tx);
    session.stop_recording().await?;

    assert_eq!(session.recorder_state(), RecorderState::Idle);
    let source = session.source().expect("recording should become the source");
    assert_eq!(source.name, "recordedAudio.wav");
    assert_eq!(source.mime, "audio/wav");

    Ok(())
}

#[tokio::test]
async fn test_starting_a_recording_clears_previous_results() -> Result<()> {
    let mut session = TranscriptionSession::new(Config::default());
    session.presenter_mut().present(sample_result());

    let (backend, tx) = ChannelBackend::new();
    session.start_recording_with(Box::new(backend)).await?;

    assert!(session.presenter().result().is_none());

    drop(tx);
    session.stop_recording().await?;

    Ok(())
}

#[tokio::test]
async fn test_operations_are_refused_while_recording() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_test_wav(&temp_dir, "audio.wav")?;

    let mut session = TranscriptionSession::new(Config::default());
    let (backend, tx) = ChannelBackend::new();
    session.start_recording_with(Box::new(backend)).await?;

    assert!(matches!(
        session.transcribe().await,
        Err(SessionError::Busy(_))
    ));
    assert!(matches!(
        session.select_file(&file),
        Err(SessionError::Busy(_))
    ));

    drop(tx);
    session.stop_recording().await?;

    // After stopping, the session is usable again
    session.select_file(&file)?;

    Ok(())
}

#[tokio::test]
async fn test_pause_and_resume_pass_through_to_the_recorder() -> Result<()> {
    let mut session = TranscriptionSession::new(Config::default());

    // No recorder: both are silently ignored
    session.pause_recording();
    session.resume_recording();
    assert_eq!(session.recorder_state(), RecorderState::Idle);

    let (backend, tx) = ChannelBackend::new();
    session.start_recording_with(Box::new(backend)).await?;

    session.pause_recording();
    assert_eq!(session.recorder_state(), RecorderState::Paused);

    session.resume_recording();
    assert_eq!(session.recorder_state(), RecorderState::Recording);

    drop(tx);
    session.stop_recording().await?;

    Ok(())
}

#[tokio::test]
async fn test_ensure_summary_synthesizes_placeholder_when_backend_omitted_it() -> Result<()> {
    let summarizer = PlaceholderSummarizer::new(Duration::from_millis(10));
    let mut session =
        TranscriptionSession::with_summarizer(Config::default(), Box::new(summarizer));

    let mut result = sample_result();
    result.summary = None;
    session.presenter_mut().present(result);

    let summary = session.ensure_summary().await?;

    assert_eq!(summary.as_deref(), Some(PLACEHOLDER_SUMMARY));
    assert_eq!(
        session.presenter().result().unwrap().summary.as_deref(),
        Some(PLACEHOLDER_SUMMARY)
    );

    Ok(())
}

#[tokio::test]
async fn test_ensure_summary_prefers_backend_summary() -> Result<()> {
    let mut session = TranscriptionSession::new(Config::default());
    session.presenter_mut().present(sample_result());

    let summary = session.ensure_summary().await?;

    assert_eq!(summary.as_deref(), Some("a summary"));

    Ok(())
}

#[tokio::test]
async fn test_key_point_extraction_requires_a_transcript() {
    let mut session = TranscriptionSession::new(Config::default());

    let err = session.extract_key_points().await.expect_err("must fail");

    assert!(matches!(err, SessionError::ExtractionFailed));
}

#[tokio::test]
async fn test_export_writes_result_documents() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = Config::default();
    config.export.output_dir = temp_dir.path().to_string_lossy().to_string();

    let mut session = TranscriptionSession::new(config);
    session.presenter_mut().present(sample_result());

    let path = session.export(echonote::ResultView::Diarization)?;

    assert_eq!(std::fs::read_to_string(path)?, "A (0-5):\nhi\n");

    Ok(())
}
