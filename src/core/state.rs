//! Shared game state: a configuration plus the deck.
//!
//! ## Derived Views
//!
//! The deck's flags are the only source of truth. Board, draw pile and
//! selection are computed on every read:
//! - `draw_pile`: `!discarded && !visible`
//! - `in_play`: `!discarded && visible`
//! - `selected`: `selected`
//!
//! Views preserve deck order, which is also the order the Set finder
//! searches in.
//!
//! ## Cloning
//!
//! The deck is an `im::Vector`, so cloning a `GameState` is cheap.

use super::config::GameConfig;
use super::ids::CardId;
use super::rng::GameRng;
use crate::cards::{Card, Deck};
use crate::rules::set;

/// Complete game state shared by both engines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    config: GameConfig,
    deck: Deck,
}

impl GameState {
    /// Wrap a configuration and a deck.
    #[must_use]
    pub fn new(config: GameConfig, deck: Deck) -> Self {
        Self { config, deck }
    }

    /// Generate a fresh deck for `config` (shuffled iff it has a seed).
    #[must_use]
    pub fn generate(config: GameConfig) -> Self {
        let mut deck = Deck::generate(&config);
        if let Some(seed) = config.shuffle_seed() {
            deck.shuffle(&mut GameRng::new(seed));
        }
        Self { config, deck }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Look up a card.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.get(id)
    }

    // === Selection ===

    /// Flip `selected` on the card with this id, wherever it is.
    ///
    /// Unknown ids are ignored. Returns `true` if the flag changed. Engines
    /// that only allow picking from the board check `is_in_play` first.
    pub fn toggle_selection(&mut self, id: CardId) -> bool {
        match self.deck.get_mut(id) {
            Some(card) => {
                card.selected = !card.selected;
                true
            }
            None => false,
        }
    }

    /// Clear `selected` on every card.
    pub fn reset_selection(&mut self) {
        for card in self.deck.iter_mut().filter(|c| c.selected) {
            card.selected = false;
        }
    }

    // === Views ===

    /// Cards not yet dealt.
    #[must_use]
    pub fn draw_pile(&self) -> Vec<&Card> {
        self.deck.iter().filter(|c| c.is_in_draw_pile()).collect()
    }

    /// Cards on the board.
    #[must_use]
    pub fn in_play(&self) -> Vec<&Card> {
        self.deck.iter().filter(|c| c.is_in_play()).collect()
    }

    /// Selected cards.
    #[must_use]
    pub fn selected(&self) -> Vec<&Card> {
        self.deck.iter().filter(|c| c.selected).collect()
    }

    /// Ids of selected cards, in deck order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<CardId> {
        self.deck.iter().filter(|c| c.selected).map(|c| c.id).collect()
    }

    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.deck.iter().filter(|c| c.is_in_draw_pile()).count()
    }

    // === Mutation ===

    /// Deal up to `count` cards from the draw pile, in deck order.
    ///
    /// Returns how many were dealt.
    pub fn deal(&mut self, count: usize) -> usize {
        let mut dealt = 0;
        for card in self.deck.iter_mut().filter(|c| c.is_in_draw_pile()).take(count) {
            card.visible = true;
            dealt += 1;
        }
        dealt
    }

    /// Retire the given cards. Unknown ids are skipped.
    ///
    /// Returns how many cards were retired.
    pub fn discard(&mut self, ids: &[CardId]) -> usize {
        let mut discarded = 0;
        for card in self.deck.iter_mut().filter(|c| ids.contains(&c.id)) {
            card.retire();
            discarded += 1;
        }
        discarded
    }

    /// Deal one card at a time until a Set is on the board or the draw pile
    /// runs out. Returns how many cards were dealt.
    pub fn deal_until_set_available(&mut self) -> usize {
        let mut dealt = 0;
        while !self.is_set_available() {
            if self.deal(1) == 0 {
                break;
            }
            dealt += 1;
        }
        dealt
    }

    /// Replace the deck wholesale (server snapshots).
    pub fn replace_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }

    // === Search ===

    /// First Set on the board, in deck order.
    #[must_use]
    pub fn find_set(&self) -> Option<Vec<&Card>> {
        set::find_set(
            &self.in_play(),
            self.config.features(),
            self.config.variation_count(),
        )
    }

    /// Is there a Set on the board?
    #[must_use]
    pub fn is_set_available(&self) -> bool {
        self.find_set().is_some()
    }

    /// Do the given cards form a Set under this configuration?
    #[must_use]
    pub fn is_set(&self, cards: &[&Card]) -> bool {
        set::is_set(cards, self.config.features(), self.config.variation_count())
    }

    /// Nothing left to draw and no Set on the board.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.draw_pile_len() == 0 && !self.is_set_available()
    }
}
