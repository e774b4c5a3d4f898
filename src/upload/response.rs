use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown in place of the transcript when the backend omits it.
pub const TRANSCRIPTION_FALLBACK: &str = "Transcription failed. Please try again.";

/// One speaker-attributed span of the transcript. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiarizationSegment {
    pub speaker: String,
    pub time_range: String,
    pub text: String,
}

/// Parsed result of a successful upload.
///
/// Replaced wholesale on each upload; cleared when a new audio source is
/// selected. `summary` and `key_points` are optional enrichments that some
/// backend versions omit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptionResult {
    pub transcription: String,
    pub summary: Option<String>,
    pub diarization: Vec<DiarizationSegment>,
    pub key_points: Option<Vec<String>>,
}

impl TranscriptionResult {
    /// Parse an upload response body.
    ///
    /// A body that is not JSON at all is an error (the upload counts as
    /// failed); within valid JSON, optional fields degrade rather than
    /// raising: a missing or empty transcription becomes the fixed fallback
    /// string, and a missing or malformed diarization becomes an empty list.
    pub fn from_response(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(&value))
    }

    fn from_value(value: &Value) -> Self {
        let transcription = value
            .get("transcription")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| TRANSCRIPTION_FALLBACK.to_string());

        let summary = value
            .get("summary")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        let diarization = value
            .get("diarization")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        // The original backend spells this "key_points" in upload responses
        // and "keypoints" in extraction responses; accept both
        let key_points = value
            .get("keypoints")
            .or_else(|| value.get("key_points"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<String>>()
            })
            .filter(|points| !points.is_empty());

        Self {
            transcription,
            summary,
            diarization,
            key_points,
        }
    }
}

/// Response body of the key-point extraction endpoint.
#[derive(Debug, Deserialize)]
pub struct KeyPointsResponse {
    pub keypoints: Vec<String>,
}
