use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::backend::{AudioFrame, CaptureBackend, CaptureConfig};

/// Microphone capture backend built on cpal.
///
/// cpal streams are not Send, so the stream lives on a dedicated thread for
/// the lifetime of the capture. Stopping sends a signal to that thread, which
/// drops the stream and releases the device.
pub struct MicBackend {
    config: CaptureConfig,
    stop_tx: Option<std_mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
    capturing: bool,
}

impl MicBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            stop_tx: None,
            thread: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing {
            anyhow::bail!("Microphone capture already active");
        }

        let (frame_tx, frame_rx) = mpsc::channel(64);
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel();
        let config = self.config.clone();

        let thread = std::thread::spawn(move || {
            run_capture_thread(config, frame_tx, ready_tx, stop_rx);
        });

        // Wait for the stream thread to report whether the device opened
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .context("Capture thread startup task panicked")?
            .context("Capture thread exited before reporting readiness")?;

        if let Err(message) = ready {
            let _ = thread.join();
            return Err(anyhow!(message));
        }

        self.stop_tx = Some(stop_tx);
        self.thread = Some(thread);
        self.capturing = true;

        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }

        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Some(thread) = self.thread.take() {
            tokio::task::spawn_blocking(move || {
                if thread.join().is_err() {
                    error!("Microphone capture thread panicked");
                }
            })
            .await
            .context("Failed to join capture thread")?;
        }

        self.capturing = false;
        info!("Microphone capture stopped, device released");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Owns the cpal stream until a stop signal arrives.
fn run_capture_thread(
    config: CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
    ready_tx: std_mpsc::Sender<std::result::Result<(), String>>,
    stop_rx: std_mpsc::Receiver<()>,
) {
    let stream = match open_input_stream(&config, frame_tx) {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));
            stream
        }
        Err(e) => {
            let _ = ready_tx.send(Err(format!("{e:#}")));
            return;
        }
    };

    // Block until stop is requested (or the backend is dropped), then drop
    // the stream so the capture device is released
    let _ = stop_rx.recv();
    drop(stream);
}

fn open_input_stream(
    config: &CaptureConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .context("No default input device available")?;

    info!(
        "Using audio device: {}",
        device.name().unwrap_or_else(|_| "Unknown".to_string())
    );

    let supported = device
        .default_input_config()
        .context("No supported input config found")?;

    // Prefer the requested rate/channels; fall back to the device default
    let requested = StreamConfig {
        channels: config.channels,
        sample_rate: SampleRate(config.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let sample_format = supported.sample_format();
    let stream = build_stream(&device, &requested, sample_format, frame_tx.clone()).or_else(|e| {
        warn!(
            "Requested audio config {:?} unavailable ({e:#}), using device default",
            requested
        );
        build_stream(&device, &supported.config(), sample_format, frame_tx)
    })?;

    stream.play().context("Failed to start input stream")?;

    Ok(stream)
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream> {
    match sample_format {
        SampleFormat::I16 => create_stream::<i16>(device, config, frame_tx),
        SampleFormat::U16 => create_stream::<u16>(device, config, frame_tx),
        SampleFormat::F32 => create_stream::<f32>(device, config, frame_tx),
        other => anyhow::bail!("Unsupported sample format: {:?}", other),
    }
}

fn create_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    frame_tx: mpsc::Sender<AudioFrame>,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + Send + 'static,
    f32: cpal::FromSample<T>,
{
    let sample_rate = config.sample_rate.0;
    let channels = config.channels;
    let mut samples_captured: u64 = 0;

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let samples: Vec<i16> = data
                .iter()
                .map(|&sample| {
                    let value: f32 = cpal::Sample::to_sample(sample);
                    (value.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
                })
                .collect();

            let timestamp_ms =
                samples_captured * 1000 / (sample_rate as u64 * channels.max(1) as u64);
            samples_captured += samples.len() as u64;

            let frame = AudioFrame {
                samples,
                sample_rate,
                channels,
                timestamp_ms,
            };

            // Non-blocking send from the realtime callback
            if frame_tx.try_send(frame).is_err() {
                warn!("Dropped audio frame: capture channel full or closed");
            }
        },
        move |err| {
            error!("Audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}
