//! Core engine types: ids, players, claims, state, RNG, configuration.
//!
//! Everything here is shared by the solo engine, the multiplayer client and
//! the server authority.

pub mod claim;
pub mod config;
pub mod ids;
pub mod player;
pub mod rng;
pub mod state;

pub use claim::{ClaimCards, ClaimRecord};
pub use config::{ConfigError, GameConfig, GameConfigBuilder, GameVersion};
pub use ids::{CardId, GameId, IdSource, PlayerId, RandomIds, RoomId};
pub use player::{is_valid_nickname, Player, Roster, MAX_NICKNAME_LEN};
pub use rng::GameRng;
pub use state::GameState;
