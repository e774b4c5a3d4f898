use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::audio::{encode_wav, AudioFrame, AudioSource, CaptureBackend};
use crate::error::SessionError;

/// How long the transient recorder status message stays visible
const STATUS_TTL: Duration = Duration::from_secs(2);

/// Capture state machine: Idle → Recording ⇄ Paused → Stopped.
///
/// Stopped is terminal; a fresh `Recorder` is created for each recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Paused,
    Stopped,
}

/// Microphone recorder.
///
/// Owns the capture backend and buffers incoming frames in arrival order
/// while in the Recording state. Frames that arrive while Paused are
/// discarded. `stop()` concatenates the buffer into a single WAV-encoded
/// [`AudioSource`] and releases the capture device.
pub struct Recorder {
    state: RecorderState,
    backend: Box<dyn CaptureBackend>,

    /// Gate checked by the drain task: frames are buffered only while true
    buffering: Arc<AtomicBool>,

    /// Buffered frames, in arrival order
    frames: Arc<Mutex<Vec<AudioFrame>>>,

    drain_task: Option<JoinHandle<()>>,

    /// Transient, auto-clearing status line (cosmetic only)
    status: Option<(String, Instant)>,
}

impl Recorder {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            state: RecorderState::Idle,
            backend,
            buffering: Arc::new(AtomicBool::new(false)),
            frames: Arc::new(Mutex::new(Vec::new())),
            drain_task: None,
            status: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Current status message, or None once it has aged out.
    pub fn status_message(&self) -> Option<&str> {
        match &self.status {
            Some((message, set_at)) if set_at.elapsed() < STATUS_TTL => Some(message),
            _ => None,
        }
    }

    /// Request microphone access and begin buffering frames.
    ///
    /// A backend failure (no device, permission denied) surfaces as
    /// [`SessionError::PermissionDenied`] and leaves the recorder Idle; the
    /// session stays usable for file selection.
    pub async fn start(&mut self) -> std::result::Result<(), SessionError> {
        if self.state != RecorderState::Idle {
            warn!("Recorder start ignored in state {:?}", self.state);
            return Ok(());
        }

        let mut audio_rx = self.backend.start().await.map_err(|e| {
            error!("Failed to start capture backend: {e:#}");
            SessionError::PermissionDenied(format!("{e:#}"))
        })?;

        self.buffering.store(true, Ordering::SeqCst);

        let buffering = Arc::clone(&self.buffering);
        let frames = Arc::clone(&self.frames);

        let drain_task = tokio::spawn(async move {
            while let Some(frame) = audio_rx.recv().await {
                if buffering.load(Ordering::SeqCst) {
                    let mut buffer = frames.lock().await;
                    buffer.push(frame);
                }
                // Frames arriving while paused are dropped
            }
        });

        self.drain_task = Some(drain_task);
        self.state = RecorderState::Recording;
        self.set_status("Recording started...");

        info!("Recording started ({})", self.backend.name());

        Ok(())
    }

    /// Pause buffering. No-op outside the Recording state.
    pub fn pause(&mut self) {
        if self.state != RecorderState::Recording {
            return;
        }

        self.buffering.store(false, Ordering::SeqCst);
        self.state = RecorderState::Paused;
        self.set_status("Recording paused.");

        info!("Recording paused");
    }

    /// Resume buffering. No-op outside the Paused state.
    pub fn resume(&mut self) {
        if self.state != RecorderState::Paused {
            return;
        }

        self.buffering.store(true, Ordering::SeqCst);
        self.state = RecorderState::Recording;
        self.set_status("Recording resumed.");

        info!("Recording resumed");
    }

    /// Finalize the recording.
    ///
    /// Valid from Recording or Paused: stops the backend (releasing the
    /// capture device), waits for buffered frames to settle, concatenates
    /// them into a WAV payload, clears the buffer, and transitions to
    /// Stopped. Returns `None` as a no-op from Idle or Stopped.
    pub async fn stop(&mut self) -> Result<Option<AudioSource>> {
        match self.state {
            RecorderState::Recording | RecorderState::Paused => {}
            _ => return Ok(None),
        }

        self.backend
            .stop()
            .await
            .context("Failed to stop capture backend")?;

        // The backend closed the frame channel; wait for the drain task to
        // finish consuming everything that was already in flight
        if let Some(task) = self.drain_task.take() {
            task.await.context("Frame drain task panicked")?;
        }

        let buffered: Vec<AudioFrame> = {
            let mut buffer = self.frames.lock().await;
            std::mem::take(&mut *buffer)
        };

        let wav = encode_wav(&buffered, 16000, 1).context("Failed to encode recording")?;

        self.buffering.store(false, Ordering::SeqCst);
        self.state = RecorderState::Stopped;
        self.set_status("Recording stopped.");

        info!(
            "Recording finalized: {} frames, {} bytes",
            buffered.len(),
            wav.len()
        );

        Ok(Some(AudioSource::from_recording(wav)))
    }

    fn set_status(&mut self, message: &str) {
        self.status = Some((message.to_string(), Instant::now()));
    }
}
