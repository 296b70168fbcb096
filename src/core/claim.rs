//! Claim records: a card group put forward as a Set, and the verdict.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::CardId;

/// Card ids of one claim. Groups hold at most four cards.
pub type ClaimCards = SmallVec<[CardId; 4]>;

/// A recorded claim with its outcome.
///
/// Used for:
/// - Solo play history and `sets_found`
/// - Hint and replay debugging
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Cards in the claim, in deck order.
    pub cards: ClaimCards,

    /// Was the group a Set?
    pub accepted: bool,

    /// Position in the game's claim history (starts at 0).
    pub sequence: u32,
}

impl ClaimRecord {
    #[must_use]
    pub fn new(cards: &[CardId], accepted: bool, sequence: u32) -> Self {
        Self {
            cards: SmallVec::from_slice(cards),
            accepted,
            sequence,
        }
    }
}
