use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::upload::DiarizationSegment;

pub const TRANSCRIPTION_FILE: &str = "transcription.txt";
pub const SUMMARY_FILE: &str = "summary.txt";
pub const KEY_POINTS_FILE: &str = "key-points.txt";
pub const DIARIZATION_FILE: &str = "speaker-diarization.txt";

/// Format a transcript for download. Pure and idempotent.
pub fn format_transcription(text: &str) -> String {
    text.to_string()
}

pub fn format_summary(text: &str) -> String {
    text.to_string()
}

/// Number key points 1..N, one per line.
pub fn format_key_points(points: &[String]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| format!("{}. {}\n", i + 1, point))
        .collect()
}

/// Serialize diarization segments as `speaker (time_range):` header lines
/// followed by the spoken text, blocks separated by blank lines.
pub fn format_diarization(segments: &[DiarizationSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("{} ({}):\n{}\n", s.speaker, s.time_range, s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse text produced by [`format_diarization`] back into segments.
pub fn parse_diarization(text: &str) -> Vec<DiarizationSegment> {
    text.split("\n\n")
        .filter_map(|block| {
            let (header, body) = block.split_once('\n')?;
            let header = header.trim_end_matches(':');
            let open = header.rfind(" (")?;
            let speaker = header[..open].to_string();
            let time_range = header[open + 2..].trim_end_matches(')').to_string();
            let text = body.trim_end_matches('\n').to_string();
            Some(DiarizationSegment {
                speaker,
                time_range,
                text,
            })
        })
        .collect()
}

/// Writes result documents to a fixed set of filenames under one directory.
///
/// Purely local formatting plus a file write; no network involvement.
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn save_transcription(&self, text: &str) -> Result<PathBuf> {
        self.write(TRANSCRIPTION_FILE, &format_transcription(text))
    }

    pub fn save_summary(&self, text: &str) -> Result<PathBuf> {
        self.write(SUMMARY_FILE, &format_summary(text))
    }

    pub fn save_key_points(&self, points: &[String]) -> Result<PathBuf> {
        self.write(KEY_POINTS_FILE, &format_key_points(points))
    }

    pub fn save_diarization(&self, segments: &[DiarizationSegment]) -> Result<PathBuf> {
        self.write(DIARIZATION_FILE, &format_diarization(segments))
    }

    fn write(&self, filename: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;

        let path = self.output_dir.join(filename);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Saved {}", path.display());

        Ok(path)
    }
}
