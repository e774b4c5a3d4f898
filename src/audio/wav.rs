use anyhow::{Context, Result};
use std::io::Cursor;

use super::backend::AudioFrame;

/// Encode buffered capture frames into an in-memory WAV payload.
///
/// Frames are written in arrival order; the WAV header takes its format from
/// the first frame. An empty frame list produces a valid, empty WAV file at
/// the given fallback format.
pub fn encode_wav(frames: &[AudioFrame], fallback_rate: u32, fallback_channels: u16) -> Result<Vec<u8>> {
    let (sample_rate, channels) = frames
        .first()
        .map(|f| (f.sample_rate, f.channels))
        .unwrap_or((fallback_rate, fallback_channels));

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());

    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;

        for frame in frames {
            for &sample in &frame.samples {
                writer
                    .write_sample(sample)
                    .context("Failed to write sample to WAV")?;
            }
        }

        writer.finalize().context("Failed to finalize WAV data")?;
    }

    Ok(cursor.into_inner())
}
