//! One room on the server: members, owner, and the current game.

use rustc_hash::FxHashSet;

use crate::cards::Deck;
use crate::core::{CardId, GameId, GameRng, GameState, GameVersion, Player, PlayerId, Roster};
use crate::protocol::{encode_deck, ServerMessage};

/// A game running in a room.
#[derive(Clone, Debug)]
pub struct RoomGame {
    pub id: GameId,
    pub version: GameVersion,
    pub state: GameState,
    pub finished: bool,
}

/// How a claim was judged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// No game running under that id.
    WrongGame,
    /// The game already ended.
    Finished,
    /// Cards not all distinct, not all in play, or not exactly `V` of them.
    Stale,
    /// Valid group, but not a Set.
    Rejected,
    /// Set accepted and the board refilled.
    Accepted { finished: bool },
}

/// Members, owner and game state of a room.
#[derive(Clone, Debug)]
pub struct Room {
    owner: PlayerId,
    roster: Roster,
    game: Option<RoomGame>,
}

impl Room {
    /// Open a room with its owner as the only member.
    #[must_use]
    pub fn new(owner: PlayerId, nickname: impl Into<String>) -> Self {
        let mut roster = Roster::new();
        roster.insert(Player::new(owner, nickname));
        Self {
            owner,
            roster,
            game: None,
        }
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn game(&self) -> Option<&RoomGame> {
        self.game.as_ref()
    }

    /// A game has been started in this room (running or finished).
    #[must_use]
    pub fn started(&self) -> bool {
        self.game.is_some()
    }

    /// A game is running and not finished.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.game.as_ref().is_some_and(|g| !g.finished)
    }

    /// Connected members.
    pub fn connected(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.roster.iter().filter(|p| p.connected).map(|p| p.id)
    }

    pub fn add_member(&mut self, player: PlayerId, nickname: impl Into<String>) {
        self.roster.insert(Player::new(player, nickname));
    }

    /// Mark a member gone. Returns `false` for non-members.
    pub fn disconnect(&mut self, player: PlayerId) -> bool {
        self.roster.set_connected(player, false)
    }

    /// Start a new game: deck ids and order both come from `rng`.
    pub fn start(&mut self, id: GameId, version: GameVersion, rng: &mut GameRng) {
        let config = version.config();
        let mut deck = Deck::generate_with(&config, rng);
        deck.shuffle(rng);

        let mut state = GameState::new(config, deck);
        state.deal(state.config().initial_deal());
        state.deal_until_set_available();

        self.roster.reset_scores();
        self.game = Some(RoomGame {
            id,
            version,
            finished: state.is_complete(),
            state,
        });
    }

    /// Judge a claim by `player`.
    ///
    /// On acceptance the cards are discarded, `V` replacements dealt, the
    /// board topped up until a Set is available, and the player scores.
    pub fn claim(&mut self, player: PlayerId, game_id: GameId, cards: &[CardId]) -> ClaimOutcome {
        let Some(game) = self.game.as_mut().filter(|g| g.id == game_id) else {
            return ClaimOutcome::WrongGame;
        };
        if game.finished {
            return ClaimOutcome::Finished;
        }

        let variation_count = game.state.config().variation_count();
        let distinct = cards.iter().collect::<FxHashSet<_>>().len() == cards.len();
        let in_play = cards
            .iter()
            .all(|id| game.state.card(*id).is_some_and(|c| c.is_in_play()));
        if cards.len() != variation_count || !distinct || !in_play {
            return ClaimOutcome::Stale;
        }

        let accepted = {
            let group: Vec<_> = cards.iter().filter_map(|id| game.state.card(*id)).collect();
            game.state.is_set(&group)
        };
        if !accepted {
            return ClaimOutcome::Rejected;
        }

        game.state.discard(cards);
        game.state.deal(variation_count);
        game.state.deal_until_set_available();
        game.finished = game.state.is_complete();

        if let Some(scorer) = self.roster.get_mut(player) {
            scorer.score += 1;
        }

        ClaimOutcome::Accepted {
            finished: game.finished,
        }
    }

    /// `STARTED_GAME` for the current game.
    #[must_use]
    pub fn started_message(&self) -> Option<ServerMessage> {
        self.game.as_ref().map(|game| ServerMessage::StartedGame {
            game_id: game.id,
            game_version: game.version,
            deck: encode_deck(game.state.deck()),
            players: self.roster.clone(),
        })
    }

    /// `GAME_OVER` if the game finished, else `CHANGED_GAME_STATE`.
    #[must_use]
    pub fn snapshot_message(&self) -> Option<ServerMessage> {
        self.game.as_ref().map(|game| {
            let deck = encode_deck(game.state.deck());
            let players = self.roster.clone();
            if game.finished {
                ServerMessage::GameOver {
                    game_id: game.id,
                    deck,
                    players,
                }
            } else {
                ServerMessage::ChangedGameState {
                    game_id: game.id,
                    deck,
                    players,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_with_game() -> (Room, PlayerId, GameId) {
        let owner = PlayerId::fresh();
        let mut room = Room::new(owner, "owner");
        let game_id = GameId::fresh();
        room.start(game_id, GameVersion::Classic, &mut GameRng::new(5));
        (room, owner, game_id)
    }

    #[test]
    fn test_start_deals_playable_board() {
        let (room, _, _) = room_with_game();
        let game = room.game().unwrap();
        assert!(game.state.in_play().len() >= 12);
        assert!(game.state.is_set_available());
        assert!(room.in_progress());
    }

    #[test]
    fn test_accepted_claim_scores() {
        let (mut room, owner, game_id) = room_with_game();
        let set: Vec<CardId> = room
            .game()
            .unwrap()
            .state
            .find_set()
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();

        let outcome = room.claim(owner, game_id, &set);
        assert_eq!(outcome, ClaimOutcome::Accepted { finished: false });
        assert_eq!(room.roster().get(owner).unwrap().score, 1);

        // Same cards again: no longer in play.
        assert_eq!(room.claim(owner, game_id, &set), ClaimOutcome::Stale);
    }

    #[test]
    fn test_claim_validation() {
        let (mut room, owner, game_id) = room_with_game();
        let board: Vec<CardId> = room
            .game()
            .unwrap()
            .state
            .in_play()
            .iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(
            room.claim(owner, GameId::fresh(), &board[..3]),
            ClaimOutcome::WrongGame
        );
        assert_eq!(room.claim(owner, game_id, &board[..2]), ClaimOutcome::Stale);
        assert_eq!(
            room.claim(owner, game_id, &[board[0], board[0], board[1]]),
            ClaimOutcome::Stale
        );
        assert_eq!(
            room.claim(owner, game_id, &[board[0], board[1], CardId::fresh()]),
            ClaimOutcome::Stale
        );
        assert_eq!(room.roster().get(owner).unwrap().score, 0);
    }

    #[test]
    fn test_snapshot_kinds() {
        let (room, _, game_id) = room_with_game();
        match room.snapshot_message() {
            Some(ServerMessage::ChangedGameState { game_id: id, deck, .. }) => {
                assert_eq!(id, game_id);
                assert_eq!(deck.len(), 81);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(room.started_message().unwrap().kind(), "STARTED_GAME");
    }
}
