use crate::upload::TranscriptionResult;

/// The four result categories a session can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Transcript,
    Summary,
    KeyPoints,
    Diarization,
}

/// View state over the most recent transcription result.
///
/// Holds at most one result at a time; a new upload replaces it wholesale
/// and resets the active view to the transcript.
#[derive(Debug, Default)]
pub struct ResultPresenter {
    result: Option<TranscriptionResult>,
    active: ResultView,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly parsed result, defaulting the view to Transcript.
    pub fn present(&mut self, result: TranscriptionResult) {
        self.result = Some(result);
        self.active = ResultView::Transcript;
    }

    /// Drop all result state (new source selected, or upload failed).
    pub fn clear(&mut self) {
        self.result = None;
        self.active = ResultView::Transcript;
    }

    pub fn result(&self) -> Option<&TranscriptionResult> {
        self.result.as_ref()
    }

    pub fn active_view(&self) -> ResultView {
        self.active
    }

    pub fn select(&mut self, view: ResultView) {
        self.active = view;
    }

    /// Whether a category currently has content to show.
    pub fn available(&self, view: ResultView) -> bool {
        let Some(result) = &self.result else {
            return false;
        };

        match view {
            ResultView::Transcript => !result.transcription.is_empty(),
            ResultView::Summary => result.summary.is_some(),
            ResultView::KeyPoints => result.key_points.is_some(),
            ResultView::Diarization => !result.diarization.is_empty(),
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.transcription.as_str())
    }

    /// Merge key points delivered by a later extraction call.
    pub fn set_key_points(&mut self, points: Vec<String>) {
        if let Some(result) = &mut self.result {
            result.key_points = Some(points);
        }
    }

    /// Record a lazily generated summary.
    pub fn set_summary(&mut self, summary: String) {
        if let Some(result) = &mut self.result {
            result.summary = Some(summary);
        }
    }

    /// Render a view as display text, in received order. Returns None when
    /// the category has no content.
    pub fn render(&self, view: ResultView) -> Option<String> {
        let result = self.result.as_ref()?;

        match view {
            ResultView::Transcript if !result.transcription.is_empty() => {
                Some(result.transcription.clone())
            }
            ResultView::Summary => result.summary.clone(),
            ResultView::KeyPoints => result.key_points.as_ref().map(|points| {
                points
                    .iter()
                    .map(|p| format!("- {p}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
            ResultView::Diarization if !result.diarization.is_empty() => Some(
                result
                    .diarization
                    .iter()
                    .map(|s| format!("{} ({}): {}", s.speaker, s.time_range, s.text))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }
}
