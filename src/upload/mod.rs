//! Upload coordination
//!
//! One upload may be in flight at a time; the session layer enforces this by
//! refusing new work rather than queueing or cancelling.

mod client;
mod progress;
mod response;

pub use client::BackendClient;
pub use progress::{ProgressTracker, UploadProgress};
pub use response::{
    DiarizationSegment, KeyPointsResponse, TranscriptionResult, TRANSCRIPTION_FALLBACK,
};
