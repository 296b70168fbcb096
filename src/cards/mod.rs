//! Card system: features, card instances, and deck generation.
//!
//! ## Key Types
//!
//! - `Feature` / `FeatureValue`: attribute dimensions and their values
//! - `Card`: one physical card (fixed values, mutable table flags)
//! - `Deck`: the full cartesian product for a configuration

pub mod card;
pub mod deck;
pub mod feature;

pub use card::{Card, FeatureValues};
pub use deck::Deck;
pub use feature::{Feature, FeatureValue, RotationEncoding};
