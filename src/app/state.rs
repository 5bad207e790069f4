//! Application state and the views derived from it.

use crate::image::EncodedImage;
use crate::scenario::ScenarioId;

/// Everything the front ends render from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// The uploaded photo.
    pub original_image: Option<EncodedImage>,
    /// The last generated selfie.
    pub generated_image: Option<EncodedImage>,
    /// A request is in flight.
    pub is_generating: bool,
    /// Currently selected scenario.
    pub selected_scenario: ScenarioId,
    /// Message of the last failed request.
    pub error: Option<String>,
}

/// Conceptual phase of the controller, derived from [`AppState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No photo uploaded.
    Idle,
    /// Photo present, nothing generated yet.
    Ready,
    /// Request in flight.
    Generating,
    /// Result present.
    Done,
    /// Last request failed.
    Failed,
}

/// What the result panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    /// Progress indicator.
    Progress,
    /// The generated image with a save action.
    Result(&'a EncodedImage),
    /// Empty-state placeholder.
    Placeholder,
}

impl AppState {
    /// Derives the current phase.
    pub fn phase(&self) -> Phase {
        if self.is_generating {
            Phase::Generating
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.generated_image.is_some() {
            Phase::Done
        } else if self.original_image.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Derives the result panel view. The error banner is independent of this.
    pub fn view(&self) -> ResultView<'_> {
        if self.is_generating {
            ResultView::Progress
        } else if let Some(image) = &self.generated_image {
            ResultView::Result(image)
        } else {
            ResultView::Placeholder
        }
    }

    /// Whether the generate action is currently available.
    pub fn can_generate(&self) -> bool {
        self.original_image.is_some() && !self.is_generating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> EncodedImage {
        EncodedImage::from_data_url("data:image/png;base64,AAAA")
    }

    #[test]
    fn test_default_state_is_idle() {
        let state = AppState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.view(), ResultView::Placeholder);
        assert_eq!(state.selected_scenario, ScenarioId::City);
        assert!(!state.can_generate());
    }

    #[test]
    fn test_phases() {
        let mut state = AppState {
            original_image: Some(image()),
            ..AppState::default()
        };
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.can_generate());

        state.is_generating = true;
        assert_eq!(state.phase(), Phase::Generating);
        assert_eq!(state.view(), ResultView::Progress);
        assert!(!state.can_generate());

        state.is_generating = false;
        state.generated_image = Some(image());
        assert_eq!(state.phase(), Phase::Done);
        assert!(matches!(state.view(), ResultView::Result(_)));

        state.error = Some("boom".into());
        assert_eq!(state.phase(), Phase::Failed);
    }

    #[test]
    fn test_progress_wins_over_result() {
        let state = AppState {
            original_image: Some(image()),
            generated_image: Some(image()),
            is_generating: true,
            ..AppState::default()
        };
        assert_eq!(state.view(), ResultView::Progress);
    }
}
