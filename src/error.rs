use thiserror::Error;

/// Error taxonomy for a transcription session.
///
/// Every variant is terminal for the attempt but non-fatal to the session:
/// after any of these the user can still re-select a file, restart a
/// recording, or resubmit a form. None of them trigger an automatic retry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Microphone could not be acquired (missing device or permission denied).
    #[error("Microphone unavailable: {0}")]
    PermissionDenied(String),

    /// An upload was requested without an active audio source.
    #[error("No file selected")]
    NoFileSelected,

    /// Upload failed: non-200 status, network error, or unparseable body.
    /// The detail is logged at the failure site; the user sees one generic
    /// message regardless of the cause.
    #[error("Error uploading audio")]
    UploadFailed,

    /// Key-point extraction failed. Prior key points are left untouched.
    #[error("Failed to extract key points. Please try again.")]
    ExtractionFailed,

    /// Authentication provider rejected the request. The provider's own
    /// message is shown verbatim.
    #[error("{0}")]
    Auth(String),

    /// An operation was refused because another one is still in flight
    /// (upload active or recording active).
    #[error("{0}")]
    Busy(&'static str),
}
