//! Solo play.
//!
//! A local state machine with no network:
//! - A completed selection is judged on the spot
//! - A Set is removed and replaced from the draw pile
//! - Anything else just clears the selection
//! - The board is topped up one card at a time until a Set is available or
//!   the draw pile is empty
//!
//! The game is complete when nothing is left to draw and no Set remains.

mod game;

pub use game::SinglePlayerGame;
