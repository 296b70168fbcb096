//! Players and the room roster.
//!
//! ## Player
//!
//! Identity, nickname, connection flag and score. The client never computes
//! scores itself; rosters arrive wholesale in server snapshots.
//!
//! ## Roster
//!
//! Players keyed by id. Serializes as a JSON object keyed by player id, the
//! shape the server sends.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ids::PlayerId;

/// Longest accepted nickname, in characters.
pub const MAX_NICKNAME_LEN: usize = 20;

/// A participant in a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub nickname: String,

    /// Still attached to the room.
    #[serde(default = "connected_by_default")]
    pub connected: bool,

    /// Sets claimed successfully in the current game.
    #[serde(default)]
    pub score: u32,
}

fn connected_by_default() -> bool {
    true
}

impl Player {
    /// Create a connected player with no score.
    #[must_use]
    pub fn new(id: PlayerId, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            connected: true,
            score: 0,
        }
    }
}

/// Check a nickname: 1 to `MAX_NICKNAME_LEN` characters, not blank.
#[must_use]
pub fn is_valid_nickname(nickname: &str) -> bool {
    let len = nickname.chars().count();
    !nickname.trim().is_empty() && len <= MAX_NICKNAME_LEN
}

/// Players in a room, keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: FxHashMap<PlayerId, Player>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a player.
    pub fn insert(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterate over players in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Is a nickname held by a connected player (case-insensitive)?
    ///
    /// Disconnected players release their nickname.
    #[must_use]
    pub fn has_nickname(&self, nickname: &str) -> bool {
        self.players
            .values()
            .any(|p| p.connected && p.nickname.eq_ignore_ascii_case(nickname))
    }

    /// Set a player's connection flag. Returns `false` for unknown players.
    pub fn set_connected(&mut self, id: PlayerId, connected: bool) -> bool {
        match self.players.get_mut(&id) {
            Some(player) => {
                player.connected = connected;
                true
            }
            None => false,
        }
    }

    /// Zero every score.
    pub fn reset_scores(&mut self) {
        for player in self.players.values_mut() {
            player.score = 0;
        }
    }

    /// Highest score in the room, `None` when empty.
    #[must_use]
    pub fn top_score(&self) -> Option<u32> {
        self.players.values().map(|p| p.score).max()
    }

    /// Every player holding the top score, sorted by id.
    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        let Some(top) = self.top_score() else {
            return Vec::new();
        };

        let mut winners: Vec<_> = self
            .players
            .values()
            .filter(|p| p.score == top)
            .map(|p| p.id)
            .collect();
        winners.sort();
        winners
    }
}

impl FromIterator<Player> for Roster {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(nickname: &str, score: u32) -> Player {
        Player {
            score,
            ..Player::new(PlayerId::fresh(), nickname)
        }
    }

    #[test]
    fn test_single_winner() {
        let alice = scored("alice", 4);
        let bob = scored("bob", 2);
        let alice_id = alice.id;
        let roster: Roster = [alice, bob].into_iter().collect();

        assert_eq!(roster.winners(), vec![alice_id]);
    }

    #[test]
    fn test_tied_winners() {
        let a = scored("a", 3);
        let b = scored("b", 3);
        let c = scored("c", 1);
        let mut expected = vec![a.id, b.id];
        expected.sort();
        let roster: Roster = [a, b, c].into_iter().collect();

        assert_eq!(roster.winners(), expected);
    }

    #[test]
    fn test_empty_roster_has_no_winners() {
        assert!(Roster::new().winners().is_empty());
        assert_eq!(Roster::new().top_score(), None);
    }

    #[test]
    fn test_nickname_rules() {
        assert!(is_valid_nickname("a"));
        assert!(is_valid_nickname(&"x".repeat(20)));
        assert!(!is_valid_nickname(&"x".repeat(21)));
        assert!(!is_valid_nickname(""));
        assert!(!is_valid_nickname("   "));

        let alice = PlayerId::fresh();
        let mut roster: Roster = [Player::new(alice, "Alice")].into_iter().collect();
        assert!(roster.has_nickname("alice"));
        assert!(!roster.has_nickname("bob"));

        roster.set_connected(alice, false);
        assert!(!roster.has_nickname("alice"));
    }

    #[test]
    fn test_connection_flag() {
        let player = Player::new(PlayerId::fresh(), "p");
        let id = player.id;
        let mut roster: Roster = [player].into_iter().collect();

        assert!(roster.set_connected(id, false));
        assert!(!roster.get(id).unwrap().connected);
        assert!(!roster.set_connected(PlayerId::fresh(), false));
    }

    #[test]
    fn test_roster_json_shape() {
        let player = Player::new(PlayerId::fresh(), "p");
        let id = player.id;
        let roster: Roster = [player].into_iter().collect();

        let json = serde_json::to_value(&roster).unwrap();
        let entry = &json[id.raw().to_string()];
        assert_eq!(entry["nickname"], "p");
        assert_eq!(entry["score"], 0);

        // Servers may omit `connected`.
        let raw = format!(r#"{{"{0}": {{"id": "{0}", "nickname": "p", "score": 2}}}}"#, id.raw());
        let parsed: Roster = serde_json::from_str(&raw).unwrap();
        assert!(parsed.get(id).unwrap().connected);
        assert_eq!(parsed.get(id).unwrap().score, 2);
    }
}
