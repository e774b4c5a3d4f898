use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Name given to every finalized microphone recording
pub const RECORDING_NAME: &str = "recordedAudio.wav";

/// Fixed MIME type for recorder output
pub const RECORDING_MIME: &str = "audio/wav";

/// An audio payload ready for upload: either a user-selected file or a
/// finalized recording.
#[derive(Debug, Clone)]
pub struct AudioSource {
    /// Raw audio bytes, uploaded as-is
    pub bytes: Vec<u8>,
    /// MIME type sent with the upload
    pub mime: String,
    /// Display name / upload filename
    pub name: String,
}

impl AudioSource {
    /// Load a user-selected audio file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        let mime = guess_mime(path);

        info!(
            "Selected audio file: {} ({} bytes, {})",
            name,
            bytes.len(),
            mime
        );

        Ok(Self { bytes, mime, name })
    }

    /// Wrap a finalized recording. Recordings always use the fixed name and
    /// WAV MIME type.
    pub fn from_recording(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: RECORDING_MIME.to_string(),
            name: RECORDING_NAME.to_string(),
        }
    }

    /// Write the payload to `dir` under its display name.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let path = dir.join(&self.name);
        fs::write(&path, &self.bytes)
            .with_context(|| format!("Failed to write audio file: {}", path.display()))?;

        info!("Saved audio to {}", path.display());

        Ok(path)
    }
}

fn guess_mime(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
    .to_string()
}
