//! Game engines built on the shared `GameState`.

pub mod multi;
pub mod single;

pub use multi::{MultiplayerGame, SyncPhase};
pub use single::SinglePlayerGame;
