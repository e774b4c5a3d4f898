//! Microphone capture control
//!
//! This module provides the `Recorder` state machine that manages:
//! - Capture backend lifecycle (acquire/release of the input device)
//! - Frame buffering in arrival order, gated by pause/resume
//! - Finalization of buffered frames into a single uploadable WAV payload
//! - Transient status messages for the UI layer

mod recorder;

pub use recorder::{Recorder, RecorderState};
