//! Common interface for game engines.
//!
//! Both engines wrap a shared `GameState` and differ in who decides what a
//! completed selection means:
//! - `SinglePlayerGame` evaluates claims locally and keeps the board playable
//! - `MultiplayerGame` forwards claims to the server and applies its snapshots

use crate::core::ids::{CardId, PlayerId};
use crate::core::state::GameState;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Solo game cleared: nothing left to draw and no Set on the board.
    Solved { sets_found: usize },
    /// Every player tied at the top score.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Solved { .. } => false,
        }
    }
}

/// Game engine trait.
///
/// ## Implementation Notes
///
/// - `apply_local_selection`: the only mutation a user drives directly
/// - `settle`: bring the state to rest (deal, apply queued messages); must be
///   safe to call any number of times
/// - `result`: `None` while the game continues
pub trait GameEngine {
    /// Current game state.
    fn state(&self) -> &GameState;

    /// Toggle selection of a card. Returns `true` if anything changed.
    fn apply_local_selection(&mut self, card: CardId) -> bool;

    /// Bring the engine to a settled state.
    fn settle(&mut self);

    /// Check if the game is over.
    fn result(&self) -> Option<GameResult>;

    /// Convenience: `result().is_some()`.
    fn is_over(&self) -> bool {
        self.result().is_some()
    }
}
