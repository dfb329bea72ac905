use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DemoError;

pub const FEATURE_COUNT: usize = 8;
pub const RULES_PER_SHAPE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeName {
    Circle,
    Square,
    Triangle,
    Rectangle,
}

impl ShapeName {
    /// Canonical ordering. Output-layer node `i` stands for `ALL[i]`.
    pub const ALL: [ShapeName; 4] = [
        ShapeName::Circle,
        ShapeName::Square,
        ShapeName::Triangle,
        ShapeName::Rectangle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeName::Circle => "circle",
            ShapeName::Square => "square",
            ShapeName::Triangle => "triangle",
            ShapeName::Rectangle => "rectangle",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ShapeName::Circle => 0,
            ShapeName::Square => 1,
            ShapeName::Triangle => 2,
            ShapeName::Rectangle => 3,
        }
    }

    pub fn definition(self) -> &'static ShapeDefinition {
        &SHAPES[self.index()]
    }

    pub fn rules(self) -> &'static RuleChecklist {
        &RULE_CHECKLISTS[self.index()]
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeName {
    type Err = DemoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        ShapeName::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DemoError::UnknownShape(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symmetry {
    #[serde(rename = "radial")]
    Radial,
    #[serde(rename = "4-fold")]
    FourFold,
    #[serde(rename = "3-fold")]
    ThreeFold,
    #[serde(rename = "2-fold")]
    TwoFold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeAttributes {
    pub corners: u8,
    pub curves: u8,
    pub symmetry: Symmetry,
    pub equal_sides: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeDefinition {
    pub name: ShapeName,
    pub display: &'static str,
    pub attributes: ShapeAttributes,
    pub features: [f32; FEATURE_COUNT],
    pub icon: &'static str,
}

pub type RuleChecklist = [&'static str; RULES_PER_SHAPE];

pub static SHAPES: [ShapeDefinition; 4] = [
    ShapeDefinition {
        name: ShapeName::Circle,
        display: "Circle",
        attributes: ShapeAttributes {
            corners: 0,
            curves: 1,
            symmetry: Symmetry::Radial,
            equal_sides: false,
        },
        features: [0.1, 0.9, 0.2, 0.1, 0.8, 0.9, 0.1, 0.2],
        icon: "○",
    },
    ShapeDefinition {
        name: ShapeName::Square,
        display: "Square",
        attributes: ShapeAttributes {
            corners: 4,
            curves: 0,
            symmetry: Symmetry::FourFold,
            equal_sides: true,
        },
        features: [0.9, 0.1, 0.9, 0.9, 0.2, 0.1, 0.9, 0.8],
        icon: "□",
    },
    ShapeDefinition {
        name: ShapeName::Triangle,
        display: "Triangle",
        attributes: ShapeAttributes {
            corners: 3,
            curves: 0,
            symmetry: Symmetry::ThreeFold,
            equal_sides: true,
        },
        features: [0.7, 0.2, 0.7, 0.6, 0.3, 0.2, 0.7, 0.5],
        icon: "△",
    },
    ShapeDefinition {
        name: ShapeName::Rectangle,
        display: "Rectangle",
        attributes: ShapeAttributes {
            corners: 4,
            curves: 0,
            symmetry: Symmetry::TwoFold,
            equal_sides: false,
        },
        features: [0.8, 0.1, 0.8, 0.6, 0.2, 0.1, 0.8, 0.4],
        icon: "▭",
    },
];

pub static RULE_CHECKLISTS: [RuleChecklist; 4] = [
    [
        "Has 0 corners",
        "Has curved edges",
        "Radial symmetry",
        "No straight sides",
    ],
    [
        "Has 4 corners",
        "All sides equal",
        "All angles 90°",
        "4-fold symmetry",
    ],
    [
        "Has 3 corners",
        "3 straight sides",
        "Angles sum to 180°",
        "3-fold symmetry",
    ],
    [
        "Has 4 corners",
        "Opposite sides equal",
        "All angles 90°",
        "2-fold symmetry",
    ],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Scripted checklist evaluation ("top-down").
    RuleBased,
    /// Scripted layered-node animation ("bottom-up").
    NetworkStyle,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::RuleBased => "Top-Down (Rule-Based)",
            Strategy::NetworkStyle => "Bottom-Up (Neural Network)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub shape: String,
    pub confidence: u8,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_table_positions() {
        for (index, shape) in ShapeName::ALL.into_iter().enumerate() {
            assert_eq!(shape.index(), index);
            assert_eq!(shape.definition().name, shape);
        }
    }

    #[test]
    fn parses_shape_names_case_insensitively() {
        assert_eq!("square".parse::<ShapeName>().unwrap(), ShapeName::Square);
        assert_eq!(" Triangle ".parse::<ShapeName>().unwrap(), ShapeName::Triangle);
        let err = "hexagon".parse::<ShapeName>().unwrap_err();
        assert!(matches!(err, DemoError::UnknownShape(name) if name == "hexagon"));
    }

    #[test]
    fn every_feature_lies_in_unit_interval() {
        for shape in &SHAPES {
            assert!(shape.features.iter().all(|f| (0.0..=1.0).contains(f)));
        }
    }

    #[test]
    fn every_shape_has_four_rules() {
        for shape in ShapeName::ALL {
            assert_eq!(shape.rules().len(), RULES_PER_SHAPE);
            assert!(shape.rules().iter().all(|rule| !rule.is_empty()));
        }
    }

    #[test]
    fn symmetry_serializes_as_tag() {
        let json = serde_json::to_string(&Symmetry::FourFold).unwrap();
        assert_eq!(json, "\"4-fold\"");
        let radial = serde_json::to_string(&Symmetry::Radial).unwrap();
        assert_eq!(radial, "\"radial\"");
    }
}
