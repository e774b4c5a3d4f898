use serde::Serialize;
use tokio::sync::watch;

/// Byte-level progress of the active upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    /// Percent complete, 0-100
    pub percent: u8,
    /// Whether a transfer is currently active
    pub in_flight: bool,
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self {
            percent: 0,
            in_flight: false,
        }
    }
}

/// Publishes upload progress over a watch channel.
///
/// Written to only by the upload path; reset at the start of each transfer.
/// The reported percentage never decreases within a transfer (no smoothing,
/// late or reordered chunk callbacks are clamped).
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    tx: watch::Sender<UploadProgress>,
}

impl ProgressTracker {
    pub fn channel() -> (Self, watch::Receiver<UploadProgress>) {
        let (tx, rx) = watch::channel(UploadProgress::default());
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> UploadProgress {
        *self.tx.borrow()
    }

    /// Reset to 0% and mark a transfer as active.
    pub fn begin(&self) {
        let _ = self.tx.send(UploadProgress {
            percent: 0,
            in_flight: true,
        });
    }

    /// Record bytes sent so far. Percentages are monotonically
    /// non-decreasing for the duration of the transfer.
    pub fn update(&self, bytes_sent: u64, bytes_total: u64) {
        let percent = if bytes_total == 0 {
            100
        } else {
            ((bytes_sent * 100) / bytes_total).min(100) as u8
        };

        let current = self.tx.borrow().percent;
        if percent < current {
            return;
        }

        let _ = self.tx.send(UploadProgress {
            percent,
            in_flight: true,
        });
    }

    /// Mark the transfer as finished, keeping the last reported percentage.
    pub fn finish(&self) {
        let percent = self.tx.borrow().percent;
        let _ = self.tx.send(UploadProgress {
            percent,
            in_flight: false,
        });
    }

    /// Clear progress entirely (new source selected, no transfer active).
    pub fn reset(&self) {
        let _ = self.tx.send(UploadProgress::default());
    }
}
