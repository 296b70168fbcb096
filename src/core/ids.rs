//! Opaque identifiers for cards, players, rooms and games.
//!
//! All identifiers are UUIDs. The engine never interprets them beyond
//! equality; room and game ids are passed through exactly as the server
//! issued them.
//!
//! ## Id Sources
//!
//! Fresh ids come from an `IdSource`. `RandomIds` draws v4 UUIDs from the
//! OS generator; `GameRng` also implements `IdSource` so seeded games get
//! reproducible ids.
//!
//! ```
//! use set_plus::core::{CardId, GameRng};
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(CardId::from_source(&mut a), CardId::from_source(&mut b));
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of collision-resistant identifiers.
pub trait IdSource {
    /// Produce the next identifier.
    fn next_uuid(&mut self) -> Uuid;
}

/// Random v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create an id from a raw UUID.
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Draw a fresh random id.
            #[must_use]
            pub fn fresh() -> Self {
                Self::from_source(&mut RandomIds)
            }

            /// Draw the next id from a source.
            #[must_use]
            pub fn from_source(source: &mut impl IdSource) -> Self {
                Self(source.next_uuid())
            }

            /// Get the raw UUID.
            #[must_use]
            pub const fn raw(self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $label, self.0)
            }
        }
    };
}

opaque_id!(
    /// Unique identifier of one physical card in a deck.
    CardId,
    "Card"
);

opaque_id!(
    /// Player identity, issued by the server on room creation or join.
    PlayerId,
    "Player"
);

opaque_id!(
    /// Multiplayer room token.
    RoomId,
    "Room"
);

opaque_id!(
    /// Game token. Snapshots carrying a different game id are stale.
    GameId,
    "Game"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_distinct() {
        let a = CardId::fresh();
        let b = CardId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let uuid = Uuid::nil();
        assert_eq!(
            format!("{}", RoomId::new(uuid)),
            "Room(00000000-0000-0000-0000-000000000000)"
        );
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = PlayerId::fresh();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.raw()));

        let deserialized: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_ids_as_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(GameId::fresh(), 1);
        let json = serde_json::to_string(&map).unwrap();
        let back: std::collections::BTreeMap<GameId, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
