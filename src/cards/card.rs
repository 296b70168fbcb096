//! Card instances: immutable feature values plus mutable table flags.
//!
//! ## Flags
//!
//! Three independent flags track where a card is:
//! - `visible`: dealt face-up to the shared board
//! - `selected`: picked by the local player (or by a claim, server-side)
//! - `discarded`: permanently out of the game
//!
//! The only rule tying them together: once an operation that discards a card
//! completes, the card is neither visible nor selected.

use smallvec::SmallVec;

use super::feature::{Feature, FeatureValue};
use crate::core::ids::CardId;

/// Per-feature values of a card, in configuration order.
pub type FeatureValues = SmallVec<[(Feature, FeatureValue); 5]>;

/// A physical card in a deck.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    /// Unique id within the game.
    pub id: CardId,

    /// Feature assignment, fixed at generation.
    values: FeatureValues,

    /// Dealt to the board.
    pub visible: bool,

    /// Currently selected.
    pub selected: bool,

    /// Out of the game.
    pub discarded: bool,
}

impl Card {
    /// Create a face-down, unselected card.
    #[must_use]
    pub fn new(id: CardId, values: impl IntoIterator<Item = (Feature, FeatureValue)>) -> Self {
        Self {
            id,
            values: values.into_iter().collect(),
            visible: false,
            selected: false,
            discarded: false,
        }
    }

    /// Value of a feature, `None` if the card doesn't carry it.
    #[must_use]
    pub fn value(&self, feature: Feature) -> Option<FeatureValue> {
        self.values
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, v)| *v)
    }

    /// All feature values.
    #[must_use]
    pub fn values(&self) -> &[(Feature, FeatureValue)] {
        &self.values
    }

    /// On the board: visible and not discarded.
    #[must_use]
    pub fn is_in_play(&self) -> bool {
        self.visible && !self.discarded
    }

    /// In the draw pile: neither visible nor discarded.
    #[must_use]
    pub fn is_in_draw_pile(&self) -> bool {
        !self.visible && !self.discarded
    }

    /// Remove the card from the game for good.
    pub fn retire(&mut self) {
        self.discarded = true;
        self.visible = false;
        self.selected = false;
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.values.iter().map(|(_, v)| v.to_string()).collect();
        write!(f, "[{}]", values.join(" "))
    }
}
