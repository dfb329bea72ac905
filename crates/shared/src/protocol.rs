//! Element identifiers and class vocabulary shared by the controller and every
//! front end that renders the demo surface.

pub mod ids {
    pub const SHAPE_CANVAS: &str = "shape-canvas";
    pub const ANALYZE_BUTTON: &str = "analyze-btn";
    pub const RESET_BUTTON: &str = "reset-demo";
    pub const COMPARE_ALL_BUTTON: &str = "compare-all";

    pub const ANALYSIS_RESULTS: &str = "analysis-results";
    pub const RESULTS_COMPARISON: &str = "results-comparison";

    pub const RULE_STEPS: &str = "rule-steps";
    pub const TOPDOWN_PROCESSING: &str = "topdown-processing";
    pub const TOPDOWN_CONFIDENCE: &str = "topdown-confidence";
    pub const TOPDOWN_PERCENTAGE: &str = "topdown-percentage";

    pub const BOTTOMUP_PROCESSING: &str = "bottomup-processing";
    pub const BOTTOMUP_CONFIDENCE: &str = "bottomup-confidence";
    pub const BOTTOMUP_PERCENTAGE: &str = "bottomup-percentage";
    pub const NETWORK_VIZ: &str = "network-viz";
    pub const INPUT_NODES: &str = "input-nodes";
    pub const HIDDEN_NODES: &str = "hidden-nodes";
    pub const OUTPUT_NODES: &str = "output-nodes";

    pub const TD_SHAPE: &str = "td-shape";
    pub const TD_CONF: &str = "td-conf";
    pub const TD_REASON: &str = "td-reason";
    pub const BU_SHAPE: &str = "bu-shape";
    pub const BU_CONF: &str = "bu-conf";
    pub const BU_REASON: &str = "bu-reason";

    pub fn input_node(index: usize) -> String {
        format!("input-{index}")
    }

    pub fn hidden_node(index: usize) -> String {
        format!("hidden-{index}")
    }

    pub fn output_node(index: usize) -> String {
        format!("output-{index}")
    }

    pub fn rule_step(index: usize) -> String {
        format!("rule-step-{index}")
    }
}

pub mod classes {
    pub const SHAPE_BUTTON: &str = "shape-btn";
    pub const SELECTED: &str = "selected";
    pub const ACTIVE: &str = "active";
    pub const PROCESSING: &str = "processing";
    pub const NODE: &str = "node";
    pub const RULE_STEP: &str = "rule-step";
    pub const CHECKING: &str = "checking";
    pub const PASSED: &str = "passed";
    pub const SHOW: &str = "show";
    pub const METER_FILL: &str = "meter-fill";
    pub const CONFIDENCE_TEXT: &str = "confidence-text";
    pub const PROCESSING_INDICATOR: &str = "processing-indicator";
}

pub mod attrs {
    pub const DATA_SHAPE: &str = "data-shape";
}

pub const NETWORK_INPUTS: usize = 8;
pub const NETWORK_HIDDEN: usize = 6;
pub const NETWORK_OUTPUTS: usize = 4;

pub const ANALYZE_LABEL: &str = "Analyze Shape";
pub const ANALYZING_LABEL: &str = "Analyzing...";
pub const COMPLETE_LABEL: &str = "Analysis Complete";

pub const COMPARE_ALL_NOTICE: &str = "Compare All Shapes feature would cycle through each shape \
and show results side by side. This demonstrates how both approaches perform across different inputs.";

pub const EMPTY_SHAPE_SLOT: &str = "-";
pub const EMPTY_CONFIDENCE: &str = "0%";
pub const EMPTY_REASON_SLOT: &str = "No analysis yet";

/// The six comparison slots in display order: rule-based shape, confidence,
/// reasoning, then network-style shape, confidence, reasoning.
pub const COMPARISON_SLOTS: [&str; 6] = [
    ids::TD_SHAPE,
    ids::TD_CONF,
    ids::TD_REASON,
    ids::BU_SHAPE,
    ids::BU_CONF,
    ids::BU_REASON,
];

/// Text a comparison slot shows before any analysis has completed.
pub fn empty_slot_text(slot_id: &str) -> &'static str {
    if slot_id.contains("shape") {
        EMPTY_SHAPE_SLOT
    } else if slot_id.contains("conf") {
        EMPTY_CONFIDENCE
    } else {
        EMPTY_REASON_SLOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_text_follows_slot_kind() {
        assert_eq!(empty_slot_text(ids::TD_SHAPE), "-");
        assert_eq!(empty_slot_text(ids::BU_CONF), "0%");
        assert_eq!(empty_slot_text(ids::BU_REASON), "No analysis yet");
    }

    #[test]
    fn node_ids_are_indexed_per_layer() {
        assert_eq!(ids::input_node(7), "input-7");
        assert_eq!(ids::hidden_node(0), "hidden-0");
        assert_eq!(ids::output_node(3), "output-3");
    }
}
