use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::audio::{AudioSource, CaptureBackend, CaptureConfig, MicBackend};
use crate::capture::{Recorder, RecorderState};
use crate::config::Config;
use crate::error::SessionError;
use crate::results::{Exporter, PlaceholderSummarizer, ResultPresenter, ResultView, Summarizer};
use crate::upload::{BackendClient, ProgressTracker, UploadProgress};

/// A transcription session: one active audio source, at most one recorder,
/// at most one in-flight upload.
///
/// Concurrent operations are refused outright rather than queued or
/// cancelled: transcribing while recording, recording while uploading, and
/// overlapping uploads all return [`SessionError::Busy`]. Every error leaves
/// the session usable.
pub struct TranscriptionSession {
    session_id: String,
    config: Config,
    client: BackendClient,
    recorder: Option<Recorder>,
    source: Option<AudioSource>,
    presenter: ResultPresenter,
    progress: ProgressTracker,
    summarizer: Box<dyn Summarizer>,
    uploading: bool,
}

impl TranscriptionSession {
    pub fn new(config: Config) -> Self {
        Self::with_summarizer(config, Box::new(PlaceholderSummarizer::default()))
    }

    pub fn with_summarizer(config: Config, summarizer: Box<dyn Summarizer>) -> Self {
        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        let client = BackendClient::new(&config.backend);
        let (progress, _) = ProgressTracker::channel();

        info!("Created transcription session: {}", session_id);

        Self {
            session_id,
            config,
            client,
            recorder: None,
            source: None,
            presenter: ResultPresenter::new(),
            progress,
            summarizer,
            uploading: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn source(&self) -> Option<&AudioSource> {
        self.source.as_ref()
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut ResultPresenter {
        &mut self.presenter
    }

    pub fn upload_progress(&self) -> UploadProgress {
        self.progress.current()
    }

    /// Watch channel for progress updates during an upload.
    pub fn subscribe_progress(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    /// Select an audio file as the active source.
    ///
    /// Clears any previous result and progress state before anything else
    /// happens.
    pub fn select_file(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.refuse_if_busy("Cannot select a file")?;

        let source = AudioSource::from_file(path).map_err(|e| {
            warn!("File selection failed: {e:#}");
            SessionError::NoFileSelected
        })?;

        self.replace_source(source);

        Ok(())
    }

    /// Start a microphone recording, replacing any previous result state.
    pub async fn start_recording(&mut self) -> Result<(), SessionError> {
        self.refuse_if_busy("Cannot start recording")?;

        let capture = CaptureConfig {
            sample_rate: self.config.audio.sample_rate,
            channels: self.config.audio.channels,
        };

        self.start_recording_with(Box::new(MicBackend::new(capture)))
            .await
    }

    /// Start a recording with an explicit capture backend.
    pub async fn start_recording_with(
        &mut self,
        backend: Box<dyn CaptureBackend>,
    ) -> Result<(), SessionError> {
        self.refuse_if_busy("Cannot start recording")?;

        let mut recorder = Recorder::new(backend);
        recorder.start().await?;

        // Starting a new recording invalidates prior results
        self.presenter.clear();
        self.progress.reset();
        self.recorder = Some(recorder);

        Ok(())
    }

    /// Pause the active recording; silently ignored when not recording.
    pub fn pause_recording(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            recorder.pause();
        }
    }

    /// Resume a paused recording; silently ignored otherwise.
    pub fn resume_recording(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            recorder.resume();
        }
    }

    /// Finalize the active recording into the session's upload candidate.
    pub async fn stop_recording(&mut self) -> Result<()> {
        let Some(recorder) = &mut self.recorder else {
            return Ok(());
        };

        if let Some(source) = recorder.stop().await.context("Failed to stop recording")? {
            self.replace_source(source);
        }

        self.recorder = None;

        Ok(())
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.recorder
            .as_ref()
            .map(Recorder::state)
            .unwrap_or(RecorderState::Idle)
    }

    /// Transient recorder status message, if one is still visible.
    pub fn recording_status(&self) -> Option<&str> {
        self.recorder.as_ref().and_then(Recorder::status_message)
    }

    /// Upload the active source and present the parsed result.
    ///
    /// Fails with [`SessionError::NoFileSelected`] before any network
    /// activity when no source is selected. On upload failure the previous
    /// transcript and summary state is cleared; nothing is merged partially.
    pub async fn transcribe(&mut self) -> Result<(), SessionError> {
        if self.uploading {
            return Err(SessionError::Busy("An upload is already in progress"));
        }
        if self.recording_active() {
            return Err(SessionError::Busy("Stop the recording before uploading"));
        }

        let Some(source) = &self.source else {
            return Err(SessionError::NoFileSelected);
        };

        self.uploading = true;
        let outcome = self.client.upload(source, &self.progress).await;
        self.uploading = false;

        match outcome {
            Ok(result) => {
                self.presenter.present(result);
                Ok(())
            }
            Err(e) => {
                self.presenter.clear();
                Err(e)
            }
        }
    }

    /// Request key points for the current transcript via the secondary
    /// endpoint. Prior key points stay untouched on failure.
    pub async fn extract_key_points(&mut self) -> Result<(), SessionError> {
        let Some(transcript) = self.presenter.transcript() else {
            warn!("Key-point extraction requested without a transcript");
            return Err(SessionError::ExtractionFailed);
        };

        let points = self.client.extract_key_points(transcript).await?;
        self.presenter.set_key_points(points);

        Ok(())
    }

    /// Return the summary, generating one locally when the backend omitted
    /// it. Requires a presented result.
    pub async fn ensure_summary(&mut self) -> Result<Option<String>> {
        let Some(result) = self.presenter.result() else {
            return Ok(None);
        };

        if let Some(summary) = &result.summary {
            return Ok(Some(summary.clone()));
        }

        let transcript = result.transcription.clone();
        let summary = self
            .summarizer
            .summarize(&transcript)
            .await
            .context("Summary generation failed")?;

        self.presenter.set_summary(summary.clone());

        Ok(Some(summary))
    }

    /// Save one result view as its fixed-name text document.
    pub fn export(&self, view: ResultView) -> Result<PathBuf> {
        let exporter = Exporter::new(&self.config.export.output_dir);
        let result = self
            .presenter
            .result()
            .context("Nothing to export: no result present")?;

        match view {
            ResultView::Transcript => exporter.save_transcription(&result.transcription),
            ResultView::Summary => {
                let summary = result.summary.as_deref().context("No summary to export")?;
                exporter.save_summary(summary)
            }
            ResultView::KeyPoints => {
                let points = result
                    .key_points
                    .as_deref()
                    .context("No key points to export")?;
                exporter.save_key_points(points)
            }
            ResultView::Diarization => exporter.save_diarization(&result.diarization),
        }
    }

    /// Save the active audio source (e.g. the finalized recording) locally.
    pub fn save_source(&self) -> Result<PathBuf> {
        let source = self.source.as_ref().context("No audio source to save")?;
        source.save(&self.config.export.output_dir)
    }

    fn recording_active(&self) -> bool {
        matches!(
            self.recorder_state(),
            RecorderState::Recording | RecorderState::Paused
        )
    }

    fn refuse_if_busy(&self, what: &'static str) -> Result<(), SessionError> {
        if self.uploading {
            warn!("{what}: an upload is in progress");
            return Err(SessionError::Busy("An upload is already in progress"));
        }
        if self.recording_active() {
            warn!("{what}: a recording is in progress");
            return Err(SessionError::Busy("A recording is already in progress"));
        }
        Ok(())
    }

    fn replace_source(&mut self, source: AudioSource) {
        info!("Active audio source: {} ({} bytes)", source.name, source.bytes.len());

        // New source invalidates everything derived from the old one
        self.presenter.clear();
        self.progress.reset();
        self.source = Some(source);
    }
}
