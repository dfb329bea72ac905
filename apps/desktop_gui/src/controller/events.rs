//! UI/backend events and error modeling for desktop GUI controller.

use demo_core::AnalyzeOutcome;
use shared::domain::ShapeName;

pub enum UiEvent {
    Info(String),
    /// Modal-style message the user should read, e.g. the compare-all placeholder.
    Notice(String),
    ShapeSelected(ShapeName),
    AnalysisFinished(AnalyzeOutcome),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Surface,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Selection,
    Analysis,
    Reset,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("surface") || lower.contains("poison") {
            UiErrorCategory::Surface
        } else if lower.contains("unknown shape") || lower.contains("invalid") {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        let scope = match self.context {
            UiErrorContext::BackendStartup => "Backend startup failed",
            UiErrorContext::Selection => "Selection failed",
            UiErrorContext::Analysis => "Analysis failed",
            UiErrorContext::Reset => "Reset failed",
        };
        format!("{scope}: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_surface_failures() {
        let err = UiError::from_message(
            UiErrorContext::Analysis,
            "Top-Down (Rule-Based) sequence failed: surface unavailable: poisoned lock",
        );
        assert_eq!(err.category(), UiErrorCategory::Surface);
        assert!(err.status_line().starts_with("Analysis failed:"));
    }

    #[test]
    fn classifies_unknown_shapes_as_validation() {
        let err = UiError::from_message(UiErrorContext::Selection, "unknown shape: hexagon");
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::Selection);
    }
}
