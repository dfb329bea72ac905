//! The demo page's element tree in its initial-load state.

use shared::{
    domain::{ShapeName, SHAPES},
    protocol::{attrs, classes, empty_slot_text, ids, ANALYZE_LABEL, COMPARISON_SLOTS},
};

use crate::surface::{Document, ElementSpec, NodeId, Surface};

pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (200, 200);

pub fn shape_button_label(shape: ShapeName) -> String {
    let definition = shape.definition();
    format!("{} {}", definition.icon, definition.display)
}

fn meter(doc: &mut Document, parent: NodeId, fill_id: &str, text_id: &str) {
    let track = doc.append_child(parent, &ElementSpec::new("confidence-meter"));
    doc.append_child(
        track,
        &ElementSpec::new(classes::METER_FILL)
            .with_id(fill_id)
            .with_style("width", "0%"),
    );
    doc.append_child(
        parent,
        &ElementSpec::new(classes::CONFIDENCE_TEXT)
            .with_id(text_id)
            .with_text("0%"),
    );
}

impl Document {
    /// Builds the controls, panels, indicators and slots the controller expects.
    pub fn demo_markup(canvas_width: u32, canvas_height: u32) -> Self {
        let mut doc = Document::new();

        let selector = doc.insert_root(&ElementSpec::new("shape-selector"));
        for shape in &SHAPES {
            doc.append_child(
                selector,
                &ElementSpec::new(classes::SHAPE_BUTTON)
                    .with_attr(attrs::DATA_SHAPE, shape.name.as_str())
                    .with_text(shape_button_label(shape.name)),
            );
        }

        doc.insert_root(
            &ElementSpec::new("shape-canvas")
                .with_id(ids::SHAPE_CANVAS)
                .canvas(canvas_width, canvas_height),
        );

        let controls = doc.insert_root(&ElementSpec::new("controls"));
        doc.append_child(
            controls,
            &ElementSpec::new("btn btn--primary")
                .with_id(ids::ANALYZE_BUTTON)
                .with_text(ANALYZE_LABEL)
                .disabled(),
        );
        doc.append_child(
            controls,
            &ElementSpec::new("btn btn--secondary")
                .with_id(ids::RESET_BUTTON)
                .with_text("Reset Demo"),
        );
        doc.append_child(
            controls,
            &ElementSpec::new("btn btn--outline")
                .with_id(ids::COMPARE_ALL_BUTTON)
                .with_text("Compare All Shapes"),
        );

        let results = doc.insert_root(
            &ElementSpec::new("analysis-results").with_id(ids::ANALYSIS_RESULTS),
        );

        let topdown = doc.append_child(results, &ElementSpec::new("approach-panel topdown"));
        doc.append_child(
            topdown,
            &ElementSpec::new(classes::PROCESSING_INDICATOR)
                .with_id(ids::TOPDOWN_PROCESSING)
                .with_text("Evaluating rules..."),
        );
        doc.append_child(topdown, &ElementSpec::new("rule-steps").with_id(ids::RULE_STEPS));
        meter(&mut doc, topdown, ids::TOPDOWN_CONFIDENCE, ids::TOPDOWN_PERCENTAGE);

        let bottomup = doc.append_child(results, &ElementSpec::new("approach-panel bottomup"));
        doc.append_child(
            bottomup,
            &ElementSpec::new(classes::PROCESSING_INDICATOR)
                .with_id(ids::BOTTOMUP_PROCESSING)
                .with_text("Extracting features..."),
        );
        let network = doc.append_child(
            bottomup,
            &ElementSpec::new("network-viz").with_id(ids::NETWORK_VIZ),
        );
        for layer in [ids::INPUT_NODES, ids::HIDDEN_NODES, ids::OUTPUT_NODES] {
            doc.append_child(network, &ElementSpec::new("layer").with_id(layer));
        }
        meter(&mut doc, bottomup, ids::BOTTOMUP_CONFIDENCE, ids::BOTTOMUP_PERCENTAGE);

        let comparison = doc.insert_root(
            &ElementSpec::new("results-comparison").with_id(ids::RESULTS_COMPARISON),
        );
        for slot in COMPARISON_SLOTS {
            doc.append_child(
                comparison,
                &ElementSpec::new("result-value")
                    .with_id(slot)
                    .with_text(empty_slot_text(slot)),
            );
        }

        doc
    }
}

impl Default for Document {
    fn default() -> Self {
        let (w, h) = DEFAULT_CANVAS_SIZE;
        Self::demo_markup(w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_carries_every_contract_id() {
        let doc = Document::demo_markup(200, 200);
        let required = [
            ids::SHAPE_CANVAS,
            ids::ANALYZE_BUTTON,
            ids::RESET_BUTTON,
            ids::COMPARE_ALL_BUTTON,
            ids::ANALYSIS_RESULTS,
            ids::RESULTS_COMPARISON,
            ids::RULE_STEPS,
            ids::TOPDOWN_PROCESSING,
            ids::TOPDOWN_CONFIDENCE,
            ids::TOPDOWN_PERCENTAGE,
            ids::BOTTOMUP_PROCESSING,
            ids::BOTTOMUP_CONFIDENCE,
            ids::BOTTOMUP_PERCENTAGE,
            ids::NETWORK_VIZ,
            ids::INPUT_NODES,
            ids::HIDDEN_NODES,
            ids::OUTPUT_NODES,
        ];
        for id in required.into_iter().chain(COMPARISON_SLOTS) {
            assert!(doc.lookup(id).is_some(), "missing element #{id}");
        }
    }

    #[test]
    fn one_button_per_shape() {
        let doc = Document::demo_markup(200, 200);
        assert_eq!(doc.query_class(classes::SHAPE_BUTTON).len(), SHAPES.len());
        for shape in ShapeName::ALL {
            assert_eq!(doc.query_attr(attrs::DATA_SHAPE, shape.as_str()).len(), 1);
        }
    }

    #[test]
    fn trigger_starts_disabled() {
        let doc = Document::demo_markup(200, 200);
        let trigger = doc.get(ids::ANALYZE_BUTTON).unwrap();
        assert!(trigger.disabled);
        assert_eq!(trigger.text, ANALYZE_LABEL);
    }
}
