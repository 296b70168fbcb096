//! Server-side authority for multiplayer rooms.
//!
//! The authority owns every deck and arbitrates claims. Each call takes
//! `&mut self`, so claims within a room are judged one at a time; callers
//! sharing an authority across tasks wrap it in a mutex.
//!
//! Handlers return the messages to deliver instead of writing to sockets.
//! The transport layer routes each `Outbound` to its recipient.
//!
//! ```
//! use set_plus::authority::Authority;
//! use set_plus::protocol::{ClientMessage, ServerMessage};
//!
//! let mut authority = Authority::new(1);
//! let player = authority.connect();
//! let out = authority.handle(player, ClientMessage::CreateRoom { nickname: Some("ann".into()) });
//! assert!(matches!(out[0].message, ServerMessage::CreatedRoom { .. }));
//! ```

mod room;

pub use room::{ClaimOutcome, Room, RoomGame};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{is_valid_nickname, CardId, GameId, GameRng, GameVersion, PlayerId, RoomId};
use crate::protocol::{ClientMessage, ClientMessageKind, ServerMessage};

/// A message addressed to one connected player.
#[derive(Clone, Debug, PartialEq)]
pub struct Outbound {
    pub to: PlayerId,
    pub message: ServerMessage,
}

impl Outbound {
    fn new(to: PlayerId, message: ServerMessage) -> Self {
        Self { to, message }
    }
}

const NICKNAME_REASON: &str = "Nickname should be 1 to 20 characters long";

/// All rooms on one server.
#[derive(Debug)]
pub struct Authority {
    rng: GameRng,
    rooms: FxHashMap<RoomId, Room>,
    members: FxHashMap<PlayerId, RoomId>,
    connections: FxHashSet<PlayerId>,
}

impl Authority {
    /// Create an authority. Every id and shuffle derives from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
            rooms: FxHashMap::default(),
            members: FxHashMap::default(),
            connections: FxHashSet::default(),
        }
    }

    /// Register a new connection and issue its player id.
    pub fn connect(&mut self) -> PlayerId {
        let player = PlayerId::from_source(&mut self.rng);
        self.connections.insert(player);
        log::debug!("[authority] {} connected", player);
        player
    }

    /// Drop a connection. Remaining room members get `LEFT_ROOM`.
    pub fn disconnect(&mut self, player: PlayerId) -> Vec<Outbound> {
        self.connections.remove(&player);
        let Some(room_id) = self.members.remove(&player) else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };

        room.disconnect(player);
        log::info!("[authority] {} left {}", player, room_id);

        let out = broadcast(room, &ServerMessage::LeftRoom { player_id: player });
        if out.is_empty() {
            log::info!("[authority] closing empty {}", room_id);
            self.rooms.remove(&room_id);
        }
        out
    }

    /// Handle one client request.
    pub fn handle(&mut self, from: PlayerId, message: ClientMessage) -> Vec<Outbound> {
        if !self.connections.contains(&from) {
            log::warn!("[authority] {} from unknown {}", message.kind(), from);
            return Vec::new();
        }

        match message {
            ClientMessage::CreateRoom { nickname } => self.create_room(from, nickname),
            ClientMessage::JoinRoom { room_id, nickname } => {
                self.join_room(from, room_id, nickname)
            }
            ClientMessage::StartGame {
                room_id,
                game_version,
            } => self.start_game(from, room_id, game_version),
            ClientMessage::CheckSet {
                card_ids,
                player_id,
                room_id,
                game_id,
            } => {
                if player_id != from {
                    log::warn!("[authority] claim names {} but came from {}", player_id, from);
                }
                self.check_set(from, room_id, game_id, &card_ids)
            }
        }
    }

    fn create_room(&mut self, from: PlayerId, nickname: Option<String>) -> Vec<Outbound> {
        let kind = ClientMessageKind::CreateRoom;
        let nickname = nickname.unwrap_or_default();
        if !is_valid_nickname(&nickname) {
            return refuse(from, kind, "nickname", NICKNAME_REASON);
        }
        if self.members.contains_key(&from) {
            return refuse(from, kind, "roomID", "Already in a room");
        }

        let room_id = RoomId::from_source(&mut self.rng);
        self.rooms.insert(room_id, Room::new(from, nickname.clone()));
        self.members.insert(from, room_id);
        log::info!("[authority] {} created {}", from, room_id);

        vec![Outbound::new(
            from,
            ServerMessage::CreatedRoom {
                room_id,
                player_id: from,
                nickname,
            },
        )]
    }

    fn join_room(
        &mut self,
        from: PlayerId,
        room_id: RoomId,
        nickname: Option<String>,
    ) -> Vec<Outbound> {
        let kind = ClientMessageKind::JoinRoom;
        let nickname = nickname.unwrap_or_default();
        if !is_valid_nickname(&nickname) {
            return refuse(from, kind, "nickname", NICKNAME_REASON);
        }
        if self.members.contains_key(&from) {
            return refuse(from, kind, "roomID", "Already in a room");
        }
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return refuse(from, kind, "roomID", "Room doesn't exist");
        };
        if room.started() {
            return refuse(from, kind, "roomID", "Game already started");
        }
        if room.roster().has_nickname(&nickname) {
            return refuse(from, kind, "nickname", "Nickname already taken");
        }

        let joined = ServerMessage::JoinedRoom {
            room_id,
            player_id: from,
            nickname: nickname.clone(),
        };

        // Joiner first hears its own reply, then one entry per existing member.
        let mut out = vec![Outbound::new(from, joined.clone())];
        for member in room.roster().iter().filter(|p| p.connected) {
            out.push(Outbound::new(
                from,
                ServerMessage::JoinedRoom {
                    room_id,
                    player_id: member.id,
                    nickname: member.nickname.clone(),
                },
            ));
        }
        out.extend(broadcast(room, &joined));

        room.add_member(from, nickname);
        self.members.insert(from, room_id);
        log::info!("[authority] {} joined {}", from, room_id);
        out
    }

    fn start_game(
        &mut self,
        from: PlayerId,
        room_id: RoomId,
        version: GameVersion,
    ) -> Vec<Outbound> {
        let kind = ClientMessageKind::StartGame;
        let Some(room) = self.member_room(from, room_id) else {
            return refuse(from, kind, "roomID", "Room doesn't exist");
        };
        if room.owner() != from {
            return refuse(from, kind, "playerID", "Only the room owner can start the game");
        }
        if room.in_progress() {
            return refuse(from, kind, "roomID", "Game already started");
        }

        let game_id = GameId::from_source(&mut self.rng);
        let mut deck_rng = self.rng.fork();
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };
        room.start(game_id, version, &mut deck_rng);
        log::info!("[authority] {} started {} ({})", room_id, game_id, version);

        match room.started_message() {
            Some(message) => broadcast(room, &message),
            None => Vec::new(),
        }
    }

    fn check_set(
        &mut self,
        from: PlayerId,
        room_id: RoomId,
        game_id: GameId,
        cards: &[CardId],
    ) -> Vec<Outbound> {
        let kind = ClientMessageKind::CheckSet;
        if self.member_room(from, room_id).is_none() {
            return refuse(from, kind, "roomID", "Room doesn't exist");
        }
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };

        let verdict = |is_set| Outbound::new(from, ServerMessage::CheckSetResult { is_set });
        match room.claim(from, game_id, cards) {
            ClaimOutcome::WrongGame => refuse(from, kind, "gameID", "Incorrect game id"),
            ClaimOutcome::Finished => refuse(from, kind, "gameID", "Game already finished"),
            ClaimOutcome::Stale | ClaimOutcome::Rejected => vec![verdict(false)],
            ClaimOutcome::Accepted { finished } => {
                log::debug!("[authority] {} scored in {}", from, game_id);
                if finished {
                    log::info!("[authority] {} finished", game_id);
                }
                let mut out = vec![verdict(true)];
                if let Some(snapshot) = room.snapshot_message() {
                    out.extend(broadcast(room, &snapshot));
                }
                out
            }
        }
    }

    fn member_room(&self, player: PlayerId, room_id: RoomId) -> Option<&Room> {
        (self.members.get(&player) == Some(&room_id))
            .then(|| self.rooms.get(&room_id))
            .flatten()
    }

    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Room a player currently belongs to.
    #[must_use]
    pub fn room_of(&self, player: PlayerId) -> Option<RoomId> {
        self.members.get(&player).copied()
    }
}

fn refuse(to: PlayerId, ref_type: ClientMessageKind, field: &str, reason: &str) -> Vec<Outbound> {
    log::debug!("[authority] refusing {} for {}: {}", ref_type, to, reason);
    vec![Outbound::new(to, ServerMessage::error(ref_type, field, reason))]
}

fn broadcast(room: &Room, message: &ServerMessage) -> Vec<Outbound> {
    room.connected()
        .map(|to| Outbound::new(to, message.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(authority: &mut Authority, nickname: &str) -> (PlayerId, RoomId) {
        let player = authority.connect();
        let out = authority.handle(
            player,
            ClientMessage::CreateRoom {
                nickname: Some(nickname.to_string()),
            },
        );
        match &out[0].message {
            ServerMessage::CreatedRoom { room_id, .. } => (player, *room_id),
            other => panic!("unexpected {:?}", other),
        }
    }

    fn field_of(out: &[Outbound]) -> Option<&str> {
        match &out.first()?.message {
            ServerMessage::Error { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_nickname_validation() {
        let mut authority = Authority::new(1);
        let player = authority.connect();

        let out = authority.handle(player, ClientMessage::CreateRoom { nickname: None });
        assert_eq!(field_of(&out), Some("nickname"));

        let out = authority.handle(
            player,
            ClientMessage::CreateRoom {
                nickname: Some("x".repeat(21)),
            },
        );
        assert_eq!(field_of(&out), Some("nickname"));
        assert_eq!(authority.room_of(player), None);
    }

    #[test]
    fn test_join_announces_members() {
        let mut authority = Authority::new(2);
        let (owner, room_id) = create(&mut authority, "ann");
        let guest = authority.connect();

        let out = authority.handle(
            guest,
            ClientMessage::JoinRoom {
                room_id,
                nickname: Some("bo".to_string()),
            },
        );

        // own reply, existing member, announcement to the owner
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].to, guest);
        assert!(matches!(
            &out[1].message,
            ServerMessage::JoinedRoom { player_id, .. } if *player_id == owner
        ));
        assert_eq!(out[2].to, owner);
        assert_eq!(authority.room(room_id).unwrap().roster().len(), 2);
    }

    #[test]
    fn test_join_refusals() {
        let mut authority = Authority::new(3);
        let (_, room_id) = create(&mut authority, "ann");
        let guest = authority.connect();

        let out = authority.handle(
            guest,
            ClientMessage::JoinRoom {
                room_id: RoomId::fresh(),
                nickname: Some("bo".to_string()),
            },
        );
        assert_eq!(field_of(&out), Some("roomID"));

        let out = authority.handle(
            guest,
            ClientMessage::JoinRoom {
                room_id,
                nickname: Some("ANN".to_string()),
            },
        );
        assert_eq!(field_of(&out), Some("nickname"));
    }

    #[test]
    fn test_only_owner_starts() {
        let mut authority = Authority::new(4);
        let (owner, room_id) = create(&mut authority, "ann");
        let guest = authority.connect();
        authority.handle(
            guest,
            ClientMessage::JoinRoom {
                room_id,
                nickname: Some("bo".to_string()),
            },
        );

        let start = ClientMessage::StartGame {
            room_id,
            game_version: GameVersion::Classic,
        };
        let out = authority.handle(guest, start.clone());
        assert_eq!(field_of(&out), Some("playerID"));

        let out = authority.handle(owner, start);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|o| o.message.kind() == "STARTED_GAME"));

        // No joining once started.
        let late = authority.connect();
        let out = authority.handle(
            late,
            ClientMessage::JoinRoom {
                room_id,
                nickname: Some("cy".to_string()),
            },
        );
        assert_eq!(field_of(&out), Some("roomID"));
    }

    #[test]
    fn test_wrong_game_id_is_an_error() {
        let mut authority = Authority::new(5);
        let (owner, room_id) = create(&mut authority, "ann");
        authority.handle(
            owner,
            ClientMessage::StartGame {
                room_id,
                game_version: GameVersion::Classic,
            },
        );

        let out = authority.handle(
            owner,
            ClientMessage::CheckSet {
                card_ids: vec![],
                player_id: owner,
                room_id,
                game_id: GameId::fresh(),
            },
        );
        assert_eq!(field_of(&out), Some("gameID"));
    }

    #[test]
    fn test_disconnect_announces_left_room() {
        let mut authority = Authority::new(6);
        let (owner, room_id) = create(&mut authority, "ann");
        let guest = authority.connect();
        authority.handle(
            guest,
            ClientMessage::JoinRoom {
                room_id,
                nickname: Some("bo".to_string()),
            },
        );

        let out = authority.disconnect(guest);
        assert_eq!(
            out,
            vec![Outbound::new(owner, ServerMessage::LeftRoom { player_id: guest })]
        );
        assert!(!authority.room(room_id).unwrap().roster().get(guest).unwrap().connected);

        // Last member out closes the room.
        assert!(authority.disconnect(owner).is_empty());
        assert!(authority.room(room_id).is_none());
    }

    #[test]
    fn test_nickname_freed_by_disconnect() {
        let mut authority = Authority::new(8);
        let (owner, room_id) = create(&mut authority, "ann");
        let join = |nickname: &str| ClientMessage::JoinRoom {
            room_id,
            nickname: Some(nickname.to_string()),
        };

        let guest = authority.connect();
        authority.handle(guest, join("bo"));
        let rival = authority.connect();
        assert_eq!(field_of(&authority.handle(rival, join("BO"))), Some("nickname"));

        authority.disconnect(guest);
        let returning = authority.connect();
        let out = authority.handle(returning, join("bo"));

        // own reply and the owner; the dropped guest is not announced
        assert_eq!(out.len(), 3);
        assert!(matches!(
            &out[0].message,
            ServerMessage::JoinedRoom { player_id, .. } if *player_id == returning
        ));
        assert_eq!(out[2].to, owner);
        assert_eq!(authority.room_of(returning), Some(room_id));
    }

    #[test]
    fn test_requests_from_unknown_connections_are_ignored() {
        let mut authority = Authority::new(7);
        let out = authority.handle(PlayerId::fresh(), ClientMessage::CreateRoom { nickname: None });
        assert!(out.is_empty());
    }
}
