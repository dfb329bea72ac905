use serde::Serialize;
use shared::domain::{AnalysisOutcome, ShapeName, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    #[default]
    Idle,
    Running,
}

/// Transient per-page state: selection, the in-progress flag and the two
/// strategy outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    selected: Option<ShapeName>,
    state: AnalysisState,
    rule_based: Option<AnalysisOutcome>,
    network_style: Option<AnalysisOutcome>,
}

impl SessionState {
    pub fn selected(&self) -> Option<ShapeName> {
        self.selected
    }

    pub fn is_running(&self) -> bool {
        self.state == AnalysisState::Running
    }

    pub fn select(&mut self, shape: ShapeName) {
        self.selected = Some(shape);
    }

    /// `Idle -> Running`, only with a selection and no run in flight.
    pub fn begin_run(&mut self) -> Option<ShapeName> {
        let shape = self.selected?;
        if self.is_running() {
            return None;
        }
        self.state = AnalysisState::Running;
        Some(shape)
    }

    pub fn finish_run(&mut self) {
        self.state = AnalysisState::Idle;
    }

    pub fn outcome(&self, strategy: Strategy) -> Option<&AnalysisOutcome> {
        match strategy {
            Strategy::RuleBased => self.rule_based.as_ref(),
            Strategy::NetworkStyle => self.network_style.as_ref(),
        }
    }

    pub fn set_outcome(&mut self, strategy: Strategy, outcome: AnalysisOutcome) {
        match strategy {
            Strategy::RuleBased => self.rule_based = Some(outcome),
            Strategy::NetworkStyle => self.network_style = Some(outcome),
        }
    }

    pub fn both_outcomes(&self) -> Option<(&AnalysisOutcome, &AnalysisOutcome)> {
        Some((self.rule_based.as_ref()?, self.network_style.as_ref()?))
    }

    pub fn clear_outcomes(&mut self) {
        self.rule_based = None;
        self.network_style = None;
    }

    /// Back to the initial-load state. Callers must not clear mid-run.
    pub fn clear(&mut self) {
        self.selected = None;
        self.clear_outcomes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_requires_selection() {
        let mut session = SessionState::default();
        assert_eq!(session.begin_run(), None);
        assert!(!session.is_running());
    }

    #[test]
    fn run_is_not_reentrant() {
        let mut session = SessionState::default();
        session.select(ShapeName::Circle);
        assert_eq!(session.begin_run(), Some(ShapeName::Circle));
        assert_eq!(session.begin_run(), None);
        session.finish_run();
        assert_eq!(session.begin_run(), Some(ShapeName::Circle));
    }

    #[test]
    fn both_outcomes_needs_each_strategy() {
        let mut session = SessionState::default();
        let outcome = AnalysisOutcome {
            shape: "Circle".into(),
            confidence: 100,
            reasoning: "r".into(),
        };
        session.set_outcome(Strategy::RuleBased, outcome.clone());
        assert!(session.both_outcomes().is_none());
        session.set_outcome(Strategy::NetworkStyle, outcome);
        assert!(session.both_outcomes().is_some());
        session.clear();
        assert!(session.both_outcomes().is_none());
        assert_eq!(session.selected(), None);
    }
}
