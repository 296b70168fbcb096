//! Single-player engine.

use im::Vector;

use crate::cards::{Card, Deck};
use crate::core::{CardId, ClaimRecord, GameConfig, GameState, GameVersion};
use crate::rules::{GameEngine, GameResult};

/// Solo game over a shared `GameState`.
#[derive(Clone, Debug)]
pub struct SinglePlayerGame {
    state: GameState,
    history: Vector<ClaimRecord>,
    complete: bool,
}

impl SinglePlayerGame {
    /// Start a game: generate the deck (shuffled iff the configuration
    /// carries a seed), deal the initial board, then settle.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut state = GameState::generate(config);
        state.deal(state.config().initial_deal());
        Self::from_state(state)
    }

    /// Start a named version with a canonical (unshuffled) deck.
    #[must_use]
    pub fn from_version(version: GameVersion) -> Self {
        Self::new(version.config())
    }

    /// Start from a prepared deck in the given order.
    #[must_use]
    pub fn with_deck(config: GameConfig, deck: Deck) -> Self {
        let mut state = GameState::new(config, deck);
        state.deal(state.config().initial_deal());
        Self::from_state(state)
    }

    /// Take over an existing board as-is, then settle.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        let mut game = Self {
            state,
            history: Vector::new(),
            complete: false,
        };
        game.settle();
        game
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Toggle a card on the board. Completing a group of `V` judges it.
    ///
    /// Ignored once the game is complete.
    pub fn toggle_selection(&mut self, card: CardId) -> bool {
        if self.complete {
            log::debug!("game complete, ignoring selection of {}", card);
            return false;
        }
        if !self.state.card(card).is_some_and(Card::is_in_play) {
            log::debug!("card {} is not on the board", card);
            return false;
        }
        let changed = self.state.toggle_selection(card);
        if changed {
            self.settle();
        }
        changed
    }

    /// Judge a full selection, then keep the board playable.
    pub fn settle(&mut self) {
        if self.complete {
            return;
        }

        let selected = self.state.selected_ids();
        if selected.len() == self.state.config().variation_count() {
            self.judge(&selected);
        }

        let dealt = self.state.deal_until_set_available();
        if dealt > 0 {
            log::debug!("dealt {} extra cards to restore a Set", dealt);
        }

        if self.state.is_complete() {
            log::info!("solo game complete after {} sets", self.sets_found());
            self.complete = true;
        }
    }

    fn judge(&mut self, selected: &[CardId]) {
        let accepted = {
            let cards: Vec<_> = selected
                .iter()
                .filter_map(|id| self.state.card(*id))
                .collect();
            self.state.is_set(&cards)
        };

        let sequence = self.history.len() as u32;
        self.history
            .push_back(ClaimRecord::new(selected, accepted, sequence));

        if accepted {
            self.state.discard(selected);
            let dealt = self.state.deal(self.state.config().variation_count());
            log::debug!("set found, {} replacements dealt", dealt);
        } else {
            self.state.reset_selection();
        }
    }

    /// Ids of the first Set on the board.
    #[must_use]
    pub fn hint(&self) -> Option<Vec<CardId>> {
        self.state
            .find_set()
            .map(|cards| cards.iter().map(|c| c.id).collect())
    }

    /// Every claim so far, in order.
    #[must_use]
    pub fn history(&self) -> &Vector<ClaimRecord> {
        &self.history
    }

    /// Number of accepted claims.
    #[must_use]
    pub fn sets_found(&self) -> usize {
        self.history.iter().filter(|r| r.accepted).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl GameEngine for SinglePlayerGame {
    fn state(&self) -> &GameState {
        &self.state
    }

    fn apply_local_selection(&mut self, card: CardId) -> bool {
        self.toggle_selection(card)
    }

    fn settle(&mut self) {
        SinglePlayerGame::settle(self);
    }

    fn result(&self) -> Option<GameResult> {
        self.complete.then(|| GameResult::Solved {
            sets_found: self.sets_found(),
        })
    }
}
