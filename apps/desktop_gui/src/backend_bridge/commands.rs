//! Backend commands queued from UI to backend worker.

use shared::domain::ShapeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    SelectShape(ShapeName),
    Analyze,
    Reset,
    CompareAll,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SelectShape(_) => "select_shape",
            BackendCommand::Analyze => "analyze",
            BackendCommand::Reset => "reset",
            BackendCommand::CompareAll => "compare_all",
        }
    }
}
