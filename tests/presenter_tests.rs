// Tests for the result presenter's view state and rendering.

use echonote::{
    DiarizationSegment, ResultPresenter, ResultView, TranscriptionResult, TRANSCRIPTION_FALLBACK,
};

fn sample_result() -> TranscriptionResult {
    TranscriptionResult {
        transcription: "hello".to_string(),
        summary: None,
        diarization: vec![DiarizationSegment {
            speaker: "A".to_string(),
            time_range: "0-5".to_string(),
            text: "hi".to_string(),
        }],
        key_points: None,
    }
}

#[test]
fn test_presenting_defaults_to_transcript_view() {
    let mut presenter = ResultPresenter::new();
    presenter.select(ResultView::Diarization);

    presenter.present(sample_result());

    assert_eq!(presenter.active_view(), ResultView::Transcript);
}

#[test]
fn test_transcript_and_diarization_rendering() {
    let mut presenter = ResultPresenter::new();
    presenter.present(sample_result());

    assert_eq!(
        presenter.render(ResultView::Transcript).as_deref(),
        Some("hello")
    );
    assert_eq!(
        presenter.render(ResultView::Diarization).as_deref(),
        Some("A (0-5): hi")
    );
}

#[test]
fn test_missing_categories_are_unavailable() {
    let mut presenter = ResultPresenter::new();
    presenter.present(sample_result());

    assert!(presenter.available(ResultView::Transcript));
    assert!(presenter.available(ResultView::Diarization));
    assert!(!presenter.available(ResultView::Summary));
    assert!(!presenter.available(ResultView::KeyPoints));
    assert!(presenter.render(ResultView::Summary).is_none());
    assert!(presenter.render(ResultView::KeyPoints).is_none());
}

#[test]
fn test_nothing_is_available_before_a_result() {
    let presenter = ResultPresenter::new();

    assert!(!presenter.available(ResultView::Transcript));
    assert!(presenter.render(ResultView::Transcript).is_none());
}

#[test]
fn test_clear_drops_all_state() {
    let mut presenter = ResultPresenter::new();
    presenter.present(sample_result());
    presenter.select(ResultView::Diarization);

    presenter.clear();

    assert!(presenter.result().is_none());
    assert_eq!(presenter.active_view(), ResultView::Transcript);
}

#[test]
fn test_key_points_merge_after_extraction() {
    let mut presenter = ResultPresenter::new();
    presenter.present(sample_result());

    presenter.set_key_points(vec!["decision".to_string(), "action".to_string()]);

    assert!(presenter.available(ResultView::KeyPoints));
    assert_eq!(
        presenter.render(ResultView::KeyPoints).as_deref(),
        Some("- decision\n- action")
    );
}

#[test]
fn test_diarization_rows_keep_received_order() {
    let mut result = sample_result();
    result.diarization.push(DiarizationSegment {
        speaker: "B".to_string(),
        time_range: "5-9".to_string(),
        text: "later".to_string(),
    });

    let mut presenter = ResultPresenter::new();
    presenter.present(result);

    assert_eq!(
        presenter.render(ResultView::Diarization).as_deref(),
        Some("A (0-5): hi\nB (5-9): later")
    );
}

#[test]
fn test_fallback_transcript_still_renders() {
    let mut presenter = ResultPresenter::new();
    presenter.present(TranscriptionResult {
        transcription: TRANSCRIPTION_FALLBACK.to_string(),
        ..Default::default()
    });

    assert_eq!(
        presenter.render(ResultView::Transcript).as_deref(),
        Some(TRANSCRIPTION_FALLBACK)
    );
}
