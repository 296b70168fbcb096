//! Deck generation.
//!
//! A deck is the full cartesian product of the active feature domains:
//! `V ^ features` cards, one per combination. Generation walks features in
//! configuration order (first feature varies slowest) and each domain in its
//! fixed order, so two decks built from the same configuration have the same
//! composition in the same sequence. Only the ids differ.
//!
//! Decks are never shuffled implicitly. Call `Deck::shuffle` (or set a
//! shuffle seed on the configuration and let an engine do it).
//!
//! ```
//! use set_plus::cards::Deck;
//! use set_plus::core::GameVersion;
//!
//! let deck = Deck::generate(&GameVersion::Classic.config());
//! assert_eq!(deck.len(), 81);
//! ```

use im::Vector;
use smallvec::SmallVec;

use super::card::Card;
use crate::core::config::GameConfig;
use crate::core::ids::{CardId, IdSource, RandomIds};
use crate::core::rng::GameRng;

/// Ordered sequence of cards for one game.
///
/// Backed by `im::Vector` so snapshots are O(1) to clone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Generate a deck with random card ids.
    #[must_use]
    pub fn generate(config: &GameConfig) -> Self {
        Self::generate_with(config, &mut RandomIds)
    }

    /// Generate a deck drawing card ids from `ids`.
    #[must_use]
    pub fn generate_with(config: &GameConfig, ids: &mut impl IdSource) -> Self {
        let features = config.features();
        let domains: SmallVec<[_; 5]> = features.iter().map(|&f| config.domain(f)).collect();

        let mut cards = Vector::new();
        let mut odometer: SmallVec<[usize; 5]> = SmallVec::from_elem(0, features.len());

        loop {
            let values = features
                .iter()
                .zip(odometer.iter())
                .zip(domains.iter())
                .map(|((&feature, &index), domain)| (feature, domain[index]));
            cards.push_back(Card::new(CardId::from_source(ids), values));

            // Advance the last feature fastest; stop once the first wraps.
            let mut position = features.len();
            loop {
                if position == 0 {
                    return Self { cards };
                }
                position -= 1;
                odometer[position] += 1;
                if odometer[position] < domains[position].len() {
                    break;
                }
                odometer[position] = 0;
            }
        }
    }

    /// Build a deck from existing cards (server snapshots, tests).
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Shuffle the card order.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over cards in deck order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Iterate mutably over cards in deck order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }

    /// Find a card by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Find a card by id, mutably.
    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Card ids in deck order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|c| c.id)
    }
}
