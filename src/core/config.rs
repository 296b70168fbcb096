//! Game configuration types.
//!
//! A game is configured by:
//! - An ordered list of active `Feature`s
//! - A variation count `V` (2, 3 or 4): values per feature, and the size of a Set
//! - How many cards are dealt face-up at the start
//! - The rotation encoding, if rotation is active
//! - An optional shuffle seed (decks are dealt in canonical order otherwise)
//!
//! Configurations are built with `GameConfigBuilder`, which validates them,
//! or looked up by key from the static `GameVersion` table.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Feature, FeatureValue, RotationEncoding};

/// Smallest supported variation count.
pub const MIN_VARIATIONS: usize = 2;

/// Largest supported variation count.
pub const MAX_VARIATIONS: usize = 4;

/// Reasons a configuration is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No features selected.
    NoFeatures,
    /// A feature was listed twice.
    DuplicateFeature(Feature),
    /// Variation count outside 2..=4.
    UnsupportedVariationCount(usize),
    /// The feature's domain has fewer values than the variation count.
    DomainTooSmall {
        feature: Feature,
        available: usize,
        requested: usize,
    },
    /// More cards requested on the initial deal than the deck holds.
    InitialDealTooLarge { deal: usize, deck_size: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFeatures => write!(f, "at least one feature is required"),
            Self::DuplicateFeature(feature) => write!(f, "feature {} listed twice", feature),
            Self::UnsupportedVariationCount(v) => write!(
                f,
                "variation count {} outside {}..={}",
                v, MIN_VARIATIONS, MAX_VARIATIONS
            ),
            Self::DomainTooSmall {
                feature,
                available,
                requested,
            } => write!(
                f,
                "feature {} has {} values, {} requested",
                feature, available, requested
            ),
            Self::InitialDealTooLarge { deal, deck_size } => {
                write!(f, "initial deal {} exceeds deck size {}", deal, deck_size)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated game configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    features: SmallVec<[Feature; 5]>,
    variation_count: usize,
    initial_deal: usize,
    rotation: RotationEncoding,
    shuffle_seed: Option<u64>,
}

impl GameConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::new()
    }

    /// Active features, in generation order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Values per feature, and the size of a Set.
    #[must_use]
    pub fn variation_count(&self) -> usize {
        self.variation_count
    }

    /// Cards dealt face-up when a game starts.
    #[must_use]
    pub fn initial_deal(&self) -> usize {
        self.initial_deal
    }

    /// Rotation encoding used by this configuration.
    #[must_use]
    pub fn rotation(&self) -> RotationEncoding {
        self.rotation
    }

    /// Seed for shuffling the deck, if shuffling is enabled.
    #[must_use]
    pub fn shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed
    }

    /// Enable shuffling with the given seed.
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Active values of a feature (the first `V` of its domain).
    #[must_use]
    pub fn domain(&self, feature: Feature) -> &'static [FeatureValue] {
        let full = feature.domain(self.rotation);
        &full[..self.variation_count.min(full.len())]
    }

    /// Is this value in play for the feature under this configuration?
    #[must_use]
    pub fn allows(&self, feature: Feature, value: FeatureValue) -> bool {
        self.features.contains(&feature) && self.domain(feature).contains(&value)
    }

    /// Number of cards in a full deck: `V ^ features`.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.variation_count.pow(self.features.len() as u32)
    }
}

/// Builder for `GameConfig`.
///
/// Defaults to the classic game: color, shape, count, shading with three
/// variations. The initial deal defaults to `features * V`.
#[derive(Clone, Debug)]
pub struct GameConfigBuilder {
    features: SmallVec<[Feature; 5]>,
    variation_count: usize,
    initial_deal: Option<usize>,
    rotation: RotationEncoding,
    shuffle_seed: Option<u64>,
}

impl Default for GameConfigBuilder {
    fn default() -> Self {
        Self {
            features: SmallVec::from_slice(&[
                Feature::Color,
                Feature::Shape,
                Feature::Count,
                Feature::Shading,
            ]),
            variation_count: 3,
            initial_deal: None,
            rotation: RotationEncoding::default(),
            shuffle_seed: None,
        }
    }
}

impl GameConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active feature list.
    #[must_use]
    pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features = features.into_iter().collect();
        self
    }

    #[must_use]
    pub fn variation_count(mut self, count: usize) -> Self {
        self.variation_count = count;
        self
    }

    #[must_use]
    pub fn initial_deal(mut self, count: usize) -> Self {
        self.initial_deal = Some(count);
        self
    }

    #[must_use]
    pub fn rotation(mut self, encoding: RotationEncoding) -> Self {
        self.rotation = encoding;
        self
    }

    #[must_use]
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        if self.features.is_empty() {
            return Err(ConfigError::NoFeatures);
        }

        for (i, feature) in self.features.iter().enumerate() {
            if self.features[..i].contains(feature) {
                return Err(ConfigError::DuplicateFeature(*feature));
            }
        }

        if !(MIN_VARIATIONS..=MAX_VARIATIONS).contains(&self.variation_count) {
            return Err(ConfigError::UnsupportedVariationCount(self.variation_count));
        }

        for &feature in &self.features {
            let available = feature.domain(self.rotation).len();
            if available < self.variation_count {
                return Err(ConfigError::DomainTooSmall {
                    feature,
                    available,
                    requested: self.variation_count,
                });
            }
        }

        let config = GameConfig {
            initial_deal: self
                .initial_deal
                .unwrap_or(self.features.len() * self.variation_count),
            features: self.features,
            variation_count: self.variation_count,
            rotation: self.rotation,
            shuffle_seed: self.shuffle_seed,
        };

        if config.initial_deal > config.deck_size() {
            return Err(ConfigError::InitialDealTooLarge {
                deal: config.initial_deal,
                deck_size: config.deck_size(),
            });
        }

        Ok(config)
    }
}

/// Named configurations shared by client and server.
///
/// Referenced on the wire by their lowercase key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVersion {
    /// 4 features, 3 variations, 12 cards dealt.
    Classic,
    /// 5 features (with named rotation), 3 variations, 15 cards dealt.
    V5x3,
    /// 4 features, 4 variations, 16 cards dealt.
    V4x4,
}

impl GameVersion {
    pub const ALL: [GameVersion; 3] = [GameVersion::Classic, GameVersion::V5x3, GameVersion::V4x4];

    /// Wire key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            GameVersion::Classic => "classic",
            GameVersion::V5x3 => "v5x3",
            GameVersion::V4x4 => "v4x4",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            GameVersion::Classic => "Classic",
            GameVersion::V5x3 => "5x3",
            GameVersion::V4x4 => "4x4",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            GameVersion::Classic => "The original game with 4 features and 3 variations.",
            GameVersion::V5x3 => "A variant with 5 features and 3 variations.",
            GameVersion::V4x4 => "A variant with 4 features and 4 variations.",
        }
    }

    /// The configuration this version stands for.
    #[must_use]
    pub fn config(self) -> GameConfig {
        let base = [Feature::Color, Feature::Shape, Feature::Count, Feature::Shading];
        let (features, variation_count, initial_deal): (SmallVec<[Feature; 5]>, usize, usize) =
            match self {
                GameVersion::Classic => (SmallVec::from_slice(&base), 3, 12),
                GameVersion::V5x3 => {
                    let mut features = SmallVec::from_slice(&base);
                    features.push(Feature::Rotation);
                    (features, 3, 15)
                }
                GameVersion::V4x4 => (SmallVec::from_slice(&base), 4, 16),
            };

        GameConfig {
            features,
            variation_count,
            initial_deal,
            rotation: RotationEncoding::Named,
            shuffle_seed: None,
        }
    }
}

impl std::fmt::Display for GameVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
