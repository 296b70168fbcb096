//! Set validation and exhaustive Set search.
//!
//! A group of `V` cards is a Set when, for every active feature, the values
//! across the group are either all the same or all different. Neither
//! function here can fail: a group of the wrong size is simply not a Set.
//!
//! ```
//! use set_plus::cards::Deck;
//! use set_plus::core::GameVersion;
//! use set_plus::rules::{find_set, is_set};
//!
//! let config = GameVersion::Classic.config();
//! let deck = Deck::generate(&config);
//! let cards: Vec<_> = deck.iter().take(12).collect();
//!
//! let found = find_set(&cards, config.features(), 3).unwrap();
//! assert!(is_set(&found, config.features(), 3));
//! ```

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::cards::{Card, Feature};

/// Check whether `cards` form a Set.
///
/// Returns `false` when `cards.len() != variation_count`. The result does not
/// depend on the order of `cards`.
#[must_use]
pub fn is_set(cards: &[&Card], features: &[Feature], variation_count: usize) -> bool {
    if cards.len() != variation_count {
        return false;
    }

    features.iter().all(|&feature| {
        let distinct: FxHashSet<_> = cards.iter().map(|card| card.value(feature)).collect();
        distinct.len() == 1 || distinct.len() == variation_count
    })
}

/// Find the first Set among `cards`.
///
/// Combinations are tried in lexicographic index order, so the same input
/// sequence always yields the same Set.
#[must_use]
pub fn find_set<'a>(
    cards: &[&'a Card],
    features: &[Feature],
    variation_count: usize,
) -> Option<Vec<&'a Card>> {
    Combinations::new(cards.len(), variation_count)
        .map(|indices| indices.iter().map(|&i| cards[i]).collect::<Vec<_>>())
        .find(|group| is_set(group, features, variation_count))
}

/// Is there at least one Set among `cards`?
#[must_use]
pub fn is_set_available(cards: &[&Card], features: &[Feature], variation_count: usize) -> bool {
    find_set(cards, features, variation_count).is_some()
}

/// All `k`-element index combinations of `0..n`, in lexicographic order.
///
/// Iterative: the current combination is the only state.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    indices: SmallVec<[usize; 4]>,
    started: bool,
    exhausted: bool,
}

impl Combinations {
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            exhausted: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = SmallVec<[usize; 4]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let k = self.indices.len();

        // Rightmost index that can still move forward.
        let mut position = k;
        loop {
            if position == 0 {
                self.exhausted = true;
                return None;
            }
            position -= 1;
            if self.indices[position] < self.n - k + position {
                break;
            }
        }

        self.indices[position] += 1;
        for next in position + 1..k {
            self.indices[next] = self.indices[next - 1] + 1;
        }

        Some(self.indices.clone())
    }
}
