//! Feature space: the attribute dimensions a card varies along.
//!
//! Every `Feature` has a fixed, ordered domain. A game configuration picks
//! a subset of features and a variation count `V`; only the first `V`
//! values of each domain are ever dealt.
//!
//! ## Value Types
//!
//! - `Named`: colors, shapes, shadings, named rotations
//! - `Number`: counts, rotations in degrees
//!
//! ## Rotation
//!
//! Rotation is encoded one of two ways, chosen per configuration:
//! - `RotationEncoding::Named`: vertical, horizontal, diagonal
//! - `RotationEncoding::Degrees`: 0, 90, 180, 270
//!
//! The two encodings are never compared with each other.

use serde::{Deserialize, Serialize};

/// An attribute dimension of a card.
///
/// On the wire `Count` is keyed as `number`; `count` is accepted as an alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Color,
    Shape,
    #[serde(rename = "number", alias = "count")]
    Count,
    Shading,
    Rotation,
}

impl Feature {
    /// JSON key used for this feature in card payloads.
    #[must_use]
    pub const fn wire_key(self) -> &'static str {
        match self {
            Feature::Color => "color",
            Feature::Shape => "shape",
            Feature::Count => "number",
            Feature::Shading => "shading",
            Feature::Rotation => "rotation",
        }
    }

    /// Alternative keys accepted on input.
    #[must_use]
    pub const fn wire_aliases(self) -> &'static [&'static str] {
        match self {
            Feature::Count => &["count"],
            _ => &[],
        }
    }

    /// Full ordered domain for this feature.
    #[must_use]
    pub fn domain(self, rotation: RotationEncoding) -> &'static [FeatureValue] {
        match self {
            Feature::Color => &COLORS,
            Feature::Shape => &SHAPES,
            Feature::Count => &COUNTS,
            Feature::Shading => &SHADINGS,
            Feature::Rotation => match rotation {
                RotationEncoding::Named => &NAMED_ROTATIONS,
                RotationEncoding::Degrees => &DEGREE_ROTATIONS,
            },
        }
    }

    /// Does this feature carry numeric values under the given encoding?
    #[must_use]
    pub fn is_numeric(self, rotation: RotationEncoding) -> bool {
        match self {
            Feature::Count => true,
            Feature::Rotation => rotation == RotationEncoding::Degrees,
            _ => false,
        }
    }

    /// Resolve a textual value against the full domain.
    ///
    /// Numeric features parse the text ("2" -> 2). Colors also accept the
    /// positional aliases `c1`..`c4`.
    #[must_use]
    pub fn lookup_text(self, text: &str, rotation: RotationEncoding) -> Option<FeatureValue> {
        if self.is_numeric(rotation) {
            let number = text.trim().parse::<u16>().ok()?;
            return self.lookup_number(number, rotation);
        }

        let domain = self.domain(rotation);
        if let Some(value) = domain.iter().find(|v| v.as_name() == Some(text)) {
            return Some(*value);
        }

        if self == Feature::Color {
            let index = COLOR_ALIASES.iter().position(|alias| *alias == text)?;
            return domain.get(index).copied();
        }

        None
    }

    /// Resolve a numeric value against the full domain.
    ///
    /// Always `None` for named features.
    #[must_use]
    pub fn lookup_number(self, number: u16, rotation: RotationEncoding) -> Option<FeatureValue> {
        if !self.is_numeric(rotation) {
            return None;
        }
        self.domain(rotation)
            .iter()
            .find(|v| v.as_number() == Some(number))
            .copied()
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Feature::Color => "color",
            Feature::Shape => "shape",
            Feature::Count => "count",
            Feature::Shading => "shading",
            Feature::Rotation => "rotation",
        };
        f.write_str(name)
    }
}

/// How rotation values are spelled in a configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationEncoding {
    /// vertical, horizontal, diagonal (three values).
    #[default]
    Named,
    /// 0, 90, 180, 270.
    Degrees,
}

/// Value of a single feature on a card.
///
/// Serialized untagged: names as JSON strings, numbers as JSON numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric value (count, rotation in degrees).
    Number(u16),
    /// Named value (color, shape, shading, named rotation).
    Named(&'static str),
}

impl FeatureValue {
    /// Get as number if this is a Number value.
    #[must_use]
    pub fn as_number(&self) -> Option<u16> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Named(_) => None,
        }
    }

    /// Get as name if this is a Named value.
    #[must_use]
    pub fn as_name(&self) -> Option<&'static str> {
        match self {
            FeatureValue::Named(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }
}

impl std::fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Named(s) => f.write_str(s),
        }
    }
}

const COLORS: [FeatureValue; 4] = [
    FeatureValue::Named("red"),
    FeatureValue::Named("green"),
    FeatureValue::Named("purple"),
    FeatureValue::Named("blue"),
];

const COLOR_ALIASES: [&str; 4] = ["c1", "c2", "c3", "c4"];

const SHAPES: [FeatureValue; 4] = [
    FeatureValue::Named("diamond"),
    FeatureValue::Named("squiggle"),
    FeatureValue::Named("oval"),
    FeatureValue::Named("arrow"),
];

const COUNTS: [FeatureValue; 4] = [
    FeatureValue::Number(1),
    FeatureValue::Number(2),
    FeatureValue::Number(3),
    FeatureValue::Number(4),
];

const SHADINGS: [FeatureValue; 4] = [
    FeatureValue::Named("solid"),
    FeatureValue::Named("striped"),
    FeatureValue::Named("empty"),
    FeatureValue::Named("dotted"),
];

const NAMED_ROTATIONS: [FeatureValue; 3] = [
    FeatureValue::Named("vertical"),
    FeatureValue::Named("horizontal"),
    FeatureValue::Named("diagonal"),
];

const DEGREE_ROTATIONS: [FeatureValue; 4] = [
    FeatureValue::Number(0),
    FeatureValue::Number(90),
    FeatureValue::Number(180),
    FeatureValue::Number(270),
];
