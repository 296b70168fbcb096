//! Game rules: Set validation, Set search, and the engine trait.
//!
//! Everything here is pure: the functions take cards by reference and never
//! touch table flags.

pub mod engine;
pub mod set;

pub use engine::{GameEngine, GameResult};
pub use set::{find_set, is_set, is_set_available, Combinations};
