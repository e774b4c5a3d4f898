//! Transcription session management
//!
//! This module provides the `TranscriptionSession` abstraction that manages:
//! - The active audio source (selected file or finalized recording)
//! - Recorder lifecycle and pass-through control
//! - Upload coordination with progress reporting
//! - Result presentation, summary generation, and local export
//! - The one-recording / one-upload-at-a-time invariants

mod session;

pub use session::TranscriptionSession;
