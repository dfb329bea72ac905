//! Plans for the reveal, rule-based and network-style sequences.

use shared::{
    domain::{AnalysisOutcome, ShapeName, Strategy},
    protocol::{classes, ids, NETWORK_HIDDEN, NETWORK_INPUTS, NETWORK_OUTPUTS},
};

use crate::{
    random::RandomSource,
    surface::{ElementSpec, SurfaceOp, Target},
    timeline::{Timeline, Timings},
};

pub const INPUT_ACTIVATION_THRESHOLD: f32 = 0.4;
/// A hidden node activates when its draw exceeds this (85% of the time).
pub const HIDDEN_DORMANT_PROBABILITY: f64 = 0.15;
pub const NETWORK_CONFIDENCE_FLOOR: u8 = 85;
pub const NETWORK_CONFIDENCE_SPREAD: f64 = 12.0;
pub const NETWORK_REASONING: &str = "Neural network classification based on 8 learned features";

#[derive(Debug, Clone, PartialEq)]
pub struct SequencePlan {
    pub strategy: Strategy,
    pub timeline: Timeline,
    pub outcome: AnalysisOutcome,
}

pub fn percent(value: u8) -> String {
    format!("{value}%")
}

fn meter_ops(fill_id: &str, text_id: &str, confidence: u8) -> [SurfaceOp; 2] {
    [
        SurfaceOp::set_style(Target::id(fill_id), "width", percent(confidence)),
        SurfaceOp::set_text(Target::id(text_id), percent(confidence)),
    ]
}

/// Brightens the results area now and marks the comparison active later.
pub fn reveal_timeline(timings: &Timings) -> Timeline {
    let mut timeline = Timeline::new();
    timeline
        .apply(SurfaceOp::set_style(
            Target::id(ids::ANALYSIS_RESULTS),
            "opacity",
            "1",
        ))
        .wait(timings.reveal_comparison)
        .apply(SurfaceOp::add_class(
            Target::id(ids::RESULTS_COMPARISON),
            classes::ACTIVE,
        ));
    timeline
}

pub fn rule_reasoning(passed: usize, total: usize) -> String {
    format!("Rule-based classification: {passed}/{total} rules matched")
}

pub fn rule_based_plan(shape: ShapeName, timings: &Timings) -> SequencePlan {
    let rules = shape.rules();
    let mut timeline = Timeline::new();

    timeline
        .apply(SurfaceOp::add_class(
            Target::id(ids::TOPDOWN_PROCESSING),
            classes::ACTIVE,
        ))
        .apply(SurfaceOp::ClearChildren {
            target: Target::id(ids::RULE_STEPS),
        })
        .wait(timings.rule_warmup)
        .apply(SurfaceOp::remove_class(
            Target::id(ids::TOPDOWN_PROCESSING),
            classes::ACTIVE,
        ));

    let mut passed = 0usize;
    for (index, rule) in rules.iter().enumerate() {
        let step_id = ids::rule_step(index);
        timeline
            .apply(SurfaceOp::AppendChild {
                parent: Target::id(ids::RULE_STEPS),
                child: ElementSpec::new(format!("{} {}", classes::RULE_STEP, classes::CHECKING))
                    .with_id(step_id.clone())
                    .with_text(format!("Checking: {rule}...")),
            })
            .apply(SurfaceOp::add_class(Target::id(step_id.clone()), classes::SHOW))
            .wait(timings.rule_check);

        // The checklist is scripted to match the selected shape.
        passed += 1;
        timeline
            .apply(SurfaceOp::SetClassName {
                target: Target::id(step_id.clone()),
                class_name: format!("{} {} {}", classes::RULE_STEP, classes::PASSED, classes::SHOW),
            })
            .apply(SurfaceOp::set_text(Target::id(step_id), format!("✓ {rule}")))
            .wait(timings.rule_settle);
    }

    let confidence = ((passed as f64 / rules.len() as f64) * 100.0).round() as u8;
    timeline.wait(timings.rule_meter);
    for op in meter_ops(ids::TOPDOWN_CONFIDENCE, ids::TOPDOWN_PERCENTAGE, confidence) {
        timeline.apply(op);
    }

    SequencePlan {
        strategy: Strategy::RuleBased,
        timeline,
        outcome: AnalysisOutcome {
            shape: shape.definition().display.to_string(),
            confidence,
            reasoning: rule_reasoning(passed, rules.len()),
        },
    }
}

/// Maps a unit draw onto the displayed network confidence, always `85..=97`.
pub fn network_confidence(draw: f64) -> u8 {
    let draw = draw.clamp(0.0, 1.0);
    (f64::from(NETWORK_CONFIDENCE_FLOOR) + draw * NETWORK_CONFIDENCE_SPREAD).round() as u8
}

fn layer_ops(timeline: &mut Timeline) {
    let layers: [(&str, usize, fn(usize) -> String); 3] = [
        (ids::INPUT_NODES, NETWORK_INPUTS, ids::input_node),
        (ids::HIDDEN_NODES, NETWORK_HIDDEN, ids::hidden_node),
        (ids::OUTPUT_NODES, NETWORK_OUTPUTS, ids::output_node),
    ];

    for (layer, count, node_id) in layers {
        timeline.apply(SurfaceOp::ClearChildren {
            target: Target::id(layer),
        });
        for index in 0..count {
            let mut node = ElementSpec::new(classes::NODE).with_id(node_id(index));
            if layer == ids::OUTPUT_NODES {
                node = node.with_title(ShapeName::ALL[index].definition().display);
            }
            timeline.apply(SurfaceOp::AppendChild {
                parent: Target::id(layer),
                child: node,
            });
        }
    }
}

pub fn network_plan(
    shape: ShapeName,
    timings: &Timings,
    random: &mut dyn RandomSource,
) -> SequencePlan {
    let definition = shape.definition();
    let mut timeline = Timeline::new();

    timeline
        .apply(SurfaceOp::add_class(
            Target::id(ids::BOTTOMUP_PROCESSING),
            classes::ACTIVE,
        ))
        .wait(timings.network_warmup);
    layer_ops(&mut timeline);
    timeline
        .wait(timings.network_build)
        .apply(SurfaceOp::remove_class(
            Target::id(ids::BOTTOMUP_PROCESSING),
            classes::ACTIVE,
        ))
        .apply(SurfaceOp::add_class(Target::id(ids::NETWORK_VIZ), classes::ACTIVE));

    timeline
        .apply(SurfaceOp::RemoveClasses {
            target: Target::Class(classes::NODE),
            classes: vec![classes::ACTIVE, classes::PROCESSING],
        })
        .wait(timings.network_reset);

    for (index, feature) in definition.features.iter().enumerate().take(NETWORK_INPUTS) {
        if *feature > INPUT_ACTIVATION_THRESHOLD {
            timeline.apply(SurfaceOp::add_class(
                Target::id(ids::input_node(index)),
                classes::ACTIVE,
            ));
        }
        timeline.wait(timings.input_step);
    }
    timeline.wait(timings.input_settle);

    for index in 0..NETWORK_HIDDEN {
        let node = Target::id(ids::hidden_node(index));
        timeline
            .apply(SurfaceOp::add_class(node.clone(), classes::PROCESSING))
            .wait(timings.hidden_step);
        if random.next_unit() > HIDDEN_DORMANT_PROBABILITY {
            timeline
                .apply(SurfaceOp::remove_class(node.clone(), classes::PROCESSING))
                .apply(SurfaceOp::add_class(node, classes::ACTIVE));
        }
    }
    timeline.wait(timings.hidden_settle);

    for index in 0..NETWORK_OUTPUTS {
        if index == shape.index() {
            timeline.apply(SurfaceOp::add_class(
                Target::id(ids::output_node(index)),
                classes::ACTIVE,
            ));
        }
        timeline.wait(timings.output_step);
    }

    let confidence = network_confidence(random.next_unit());
    for op in meter_ops(ids::BOTTOMUP_CONFIDENCE, ids::BOTTOMUP_PERCENTAGE, confidence) {
        timeline.apply(op);
    }

    SequencePlan {
        strategy: Strategy::NetworkStyle,
        timeline,
        outcome: AnalysisOutcome {
            shape: definition.display.to_string(),
            confidence,
            reasoning: NETWORK_REASONING.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use std::time::Duration;

    fn activated_ids(timeline: &Timeline, class: &str) -> Vec<String> {
        timeline
            .ops()
            .filter_map(|op| match op {
                SurfaceOp::AddClass {
                    target: Target::Id(id),
                    class: added,
                } if *added == class => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rule_plan_always_passes_every_rule() {
        for shape in ShapeName::ALL {
            let plan = rule_based_plan(shape, &Timings::default());
            assert_eq!(plan.outcome.confidence, 100);
            assert!(plan.outcome.reasoning.ends_with("4/4 rules matched"));
            assert_eq!(plan.outcome.shape, shape.definition().display);
        }
    }

    #[test]
    fn rule_plan_duration_matches_checklist_pacing() {
        let plan = rule_based_plan(ShapeName::Square, &Timings::default());
        // 800 warmup + 4 × (1000 + 400) + 300 meter.
        assert_eq!(plan.timeline.total_duration(), Duration::from_millis(6700));
    }

    #[test]
    fn rule_steps_are_shown_then_marked_passed() {
        let plan = rule_based_plan(ShapeName::Triangle, &Timings::default());
        let passed: Vec<_> = plan
            .timeline
            .ops()
            .filter_map(|op| match op {
                SurfaceOp::SetText { text, .. } if text.starts_with('✓') => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            passed,
            ShapeName::Triangle
                .rules()
                .iter()
                .map(|rule| format!("✓ {rule}"))
                .collect::<Vec<_>>()
        );
        assert_eq!(activated_ids(&plan.timeline, classes::SHOW).len(), 4);
    }

    #[test]
    fn network_confidence_stays_in_band() {
        assert_eq!(network_confidence(0.0), 85);
        assert_eq!(network_confidence(0.999_999), 97);
        assert_eq!(network_confidence(1.0), 97);
        assert_eq!(network_confidence(-3.0), 85);
        for step in 0..=1000 {
            let value = network_confidence(step as f64 / 1000.0);
            assert!((85..=97).contains(&value));
        }
    }

    #[test]
    fn inputs_follow_feature_threshold() {
        let mut random = ScriptedRandom::constant(0.5);
        let plan = network_plan(ShapeName::Circle, &Timings::default(), &mut random);
        let inputs: Vec<_> = activated_ids(&plan.timeline, classes::ACTIVE)
            .into_iter()
            .filter(|id| id.starts_with("input-"))
            .collect();
        // Circle features above 0.4: indices 1, 4, 5.
        assert_eq!(inputs, vec!["input-1", "input-4", "input-5"]);
    }

    #[test]
    fn hidden_nodes_can_stay_processing() {
        // Six hidden draws, then the confidence draw.
        let mut random = ScriptedRandom::new(vec![0.9, 0.1, 0.9, 0.15, 0.9, 0.9, 0.5]);
        let plan = network_plan(ShapeName::Square, &Timings::default(), &mut random);
        let active_hidden: Vec<_> = activated_ids(&plan.timeline, classes::ACTIVE)
            .into_iter()
            .filter(|id| id.starts_with("hidden-"))
            .collect();
        assert_eq!(active_hidden, vec!["hidden-0", "hidden-2", "hidden-4", "hidden-5"]);
        assert_eq!(activated_ids(&plan.timeline, classes::PROCESSING).len(), NETWORK_HIDDEN);
        assert_eq!(plan.outcome.confidence, 91);
    }

    #[test]
    fn only_the_selected_output_activates() {
        for shape in ShapeName::ALL {
            let mut random = ScriptedRandom::constant(0.3);
            let plan = network_plan(shape, &Timings::default(), &mut random);
            let outputs: Vec<_> = activated_ids(&plan.timeline, classes::ACTIVE)
                .into_iter()
                .filter(|id| id.starts_with("output-"))
                .collect();
            assert_eq!(outputs, vec![ids::output_node(shape.index())]);
        }
    }

    #[test]
    fn output_nodes_carry_shape_titles() {
        let mut random = ScriptedRandom::constant(0.3);
        let plan = network_plan(ShapeName::Square, &Timings::default(), &mut random);
        let titles: Vec<_> = plan
            .timeline
            .ops()
            .filter_map(|op| match op {
                SurfaceOp::AppendChild { child, .. } => child.title.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["Circle", "Square", "Triangle", "Rectangle"]);
    }

    #[test]
    fn reveal_marks_comparison_after_delay() {
        let timeline = reveal_timeline(&Timings::default());
        assert_eq!(timeline.total_duration(), Duration::from_millis(2000));
        assert_eq!(
            activated_ids(&timeline, classes::ACTIVE),
            vec![ids::RESULTS_COMPARISON.to_string()]
        );
    }
}
