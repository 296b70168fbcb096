//! Multiplayer client.
//!
//! The server owns the game. This side:
//! - Requests rooms and games
//! - Keeps selection locally and sends a claim when it reaches `V` cards
//! - Applies server messages strictly in arrival order, each exactly once
//! - Drops snapshots that belong to another game
//!
//! Phases run `Idle → RoomPending → RoomReady → InGame → Over`; `Over` is
//! terminal and ignores any later message.

mod game;
mod inbox;

pub use game::{drive, FieldError, Identity, MultiplayerGame, SyncPhase};
pub use inbox::{Inbox, InboxEntry};
