pub mod audio;
pub mod auth;
pub mod capture;
pub mod config;
pub mod error;
pub mod results;
pub mod session;
pub mod upload;

pub use audio::{AudioFrame, AudioSource, CaptureBackend, CaptureConfig, MicBackend};
pub use auth::{AuthClient, AuthSession};
pub use capture::{Recorder, RecorderState};
pub use config::Config;
pub use error::SessionError;
pub use results::{
    Exporter, PlaceholderSummarizer, ResultPresenter, ResultView, Summarizer,
};
pub use session::TranscriptionSession;
pub use upload::{
    BackendClient, DiarizationSegment, ProgressTracker, TranscriptionResult, UploadProgress,
    TRANSCRIPTION_FALLBACK,
};
