use bytes::Bytes;
use futures::StreamExt;
use reqwest::multipart;
use tracing::{error, info};

use crate::audio::AudioSource;
use crate::config::BackendConfig;
use crate::error::SessionError;

use super::progress::ProgressTracker;
use super::response::{KeyPointsResponse, TranscriptionResult};

/// HTTP client for the transcription backend.
///
/// The backend is an opaque collaborator: one multipart POST per upload, one
/// JSON POST per key-point extraction, no retries anywhere. Any failure is
/// terminal for that attempt and requires explicit re-initiation.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    chunk_bytes: usize,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chunk_bytes: config.upload_chunk_bytes.max(1),
        }
    }

    /// Upload an audio payload for transcription.
    ///
    /// The body is streamed in fixed-size chunks; `progress` is updated with
    /// a monotonically non-decreasing percentage as each chunk goes out.
    /// Non-200 status, network errors, and unparseable bodies all collapse
    /// into the single generic [`SessionError::UploadFailed`].
    pub async fn upload(
        &self,
        source: &AudioSource,
        progress: &ProgressTracker,
    ) -> Result<TranscriptionResult, SessionError> {
        let url = format!("{}/upload", self.base_url);
        let total = source.bytes.len() as u64;

        info!("Uploading {} ({} bytes) to {}", source.name, total, url);

        progress.begin();
        let result = self.do_upload(&url, source, total, progress).await;
        progress.finish();

        result
    }

    async fn do_upload(
        &self,
        url: &str,
        source: &AudioSource,
        total: u64,
        progress: &ProgressTracker,
    ) -> Result<TranscriptionResult, SessionError> {
        let chunks: Vec<Bytes> = source
            .bytes
            .chunks(self.chunk_bytes)
            .map(Bytes::copy_from_slice)
            .collect();

        let tracker = progress.clone();
        let mut bytes_sent: u64 = 0;

        // Progress fires as reqwest pulls each chunk off the stream
        let body = futures::stream::iter(chunks).map(move |chunk| {
            bytes_sent += chunk.len() as u64;
            tracker.update(bytes_sent, total);
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let part = multipart::Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(source.name.clone())
            .mime_str(&source.mime)
            .map_err(|e| {
                error!("Invalid upload MIME type {}: {e}", source.mime);
                SessionError::UploadFailed
            })?;

        let form = multipart::Form::new().part("audio", part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Upload request failed: {e}");
                SessionError::UploadFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Upload rejected with status {}", status);
            return Err(SessionError::UploadFailed);
        }

        let body = response.text().await.map_err(|e| {
            error!("Failed to read upload response: {e}");
            SessionError::UploadFailed
        })?;

        let result = TranscriptionResult::from_response(&body).map_err(|e| {
            error!("Failed to parse upload response: {e}");
            SessionError::UploadFailed
        })?;

        info!(
            "Upload complete: {} diarization segments, summary={}, key points={}",
            result.diarization.len(),
            result.summary.is_some(),
            result.key_points.as_ref().map(Vec::len).unwrap_or(0)
        );

        Ok(result)
    }

    /// Ask the backend to extract key points from an existing transcript.
    ///
    /// Independent of the upload path; failures leave any previously
    /// displayed key points untouched.
    pub async fn extract_key_points(
        &self,
        transcript: &str,
    ) -> Result<Vec<String>, SessionError> {
        let url = format!("{}/extract-keypoints", self.base_url);

        info!("Requesting key points from {}", url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "transcription": transcript }))
            .send()
            .await
            .map_err(|e| {
                error!("Key-point request failed: {e}");
                SessionError::ExtractionFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Key-point extraction rejected with status {}", status);
            return Err(SessionError::ExtractionFailed);
        }

        let body: KeyPointsResponse = response.json().await.map_err(|e| {
            error!("Failed to parse key-point response: {e}");
            SessionError::ExtractionFailed
        })?;

        info!("Extracted {} key points", body.keypoints.len());

        Ok(body.keypoints)
    }
}
