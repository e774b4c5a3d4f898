mod export;
mod presenter;
mod summary;

pub use export::{
    format_diarization, format_key_points, format_summary, format_transcription,
    parse_diarization, Exporter, DIARIZATION_FILE, KEY_POINTS_FILE, SUMMARY_FILE,
    TRANSCRIPTION_FILE,
};
pub use presenter::{ResultPresenter, ResultView};
pub use summary::{PlaceholderSummarizer, Summarizer, PLACEHOLDER_SUMMARY};
