pub mod backend;
pub mod mic;
pub mod source;
pub mod wav;

pub use backend::{AudioFrame, CaptureBackend, CaptureConfig};
pub use mic::MicBackend;
pub use source::{AudioSource, RECORDING_MIME, RECORDING_NAME};
pub use wav::encode_wav;
