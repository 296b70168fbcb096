//! # set-plus
//!
//! Engine for the Set card-matching game: find `V` cards where every feature
//! is either all the same or all different.
//!
//! ## Design Principles
//!
//! 1. **Configurable feature space**: features, variation count and deal
//!    size come from a `GameConfig`, not from hardcoded rules.
//!
//! 2. **One state, two engines**: `GameState` holds the deck; the solo engine
//!    mutates it locally while the multiplayer client only mirrors server
//!    snapshots.
//!
//! 3. **Derived views on read**: board, draw pile and selection are computed
//!    from card flags, never stored separately.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: decks and claim history use `im-rs`, so
//!   snapshots clone in O(1).
//!
//! - **Deterministic randomness**: shuffles and ids can come from a seeded
//!   `GameRng`.
//!
//! ## Modules
//!
//! - `core`: ids, configuration, players, game state, RNG
//! - `cards`: features, cards, deck generation
//! - `rules`: Set validation and search, the `GameEngine` trait
//! - `games`: single-player engine and multiplayer client
//! - `protocol`: wire messages, card payloads, transport
//! - `authority`: server-side rooms and claim arbitration

pub mod authority;
pub mod cards;
pub mod core;
pub mod games;
pub mod protocol;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    CardId, ClaimRecord, ConfigError, GameConfig, GameConfigBuilder, GameId, GameRng, GameState,
    GameVersion, Player, PlayerId, RoomId, Roster,
};

pub use crate::cards::{Card, Deck, Feature, FeatureValue, RotationEncoding};

pub use crate::rules::{find_set, is_set, is_set_available, GameEngine, GameResult};

pub use crate::games::{MultiplayerGame, SinglePlayerGame, SyncPhase};

pub use crate::protocol::{
    ChannelTransport, ClientMessage, ProtocolError, ServerMessage, Transport, WireCard,
};

pub use crate::authority::{Authority, Outbound};
