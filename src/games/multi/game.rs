//! Multiplayer client engine.

use rustc_hash::FxHashMap;
use tokio::sync::mpsc::UnboundedReceiver;

use super::inbox::Inbox;
use crate::cards::{Card, Deck};
use crate::core::{CardId, GameId, GameState, GameVersion, Player, PlayerId, RoomId, Roster};
use crate::protocol::{
    decode_deck, ClientMessage, ClientMessageKind, ProtocolError, ServerMessage, Transport,
    WireCard,
};
use crate::rules::{GameEngine, GameResult};

/// Where the client is in a session. `Over` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    RoomPending,
    RoomReady,
    InGame,
    Over,
}

/// Identity issued by the server for this client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub player_id: PlayerId,
    pub room_id: RoomId,
    pub nickname: String,
    /// Created the room (and may start games).
    pub is_owner: bool,
}

/// A refusal reported by the server for one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub ref_type: ClientMessageKind,
    pub reason: String,
}

/// Client-side projection of a server-run game.
///
/// The only local mutations are selection toggles and claim emission.
/// Everything else is replaced wholesale by server snapshots, applied in
/// arrival order by `settle`.
#[derive(Debug)]
pub struct MultiplayerGame<T: Transport> {
    transport: T,
    phase: SyncPhase,
    identity: Option<Identity>,
    game_id: Option<GameId>,
    version: Option<GameVersion>,
    state: GameState,
    roster: Roster,
    inbox: Inbox,
    errors: FxHashMap<String, FieldError>,
    /// A claim went out for the current full selection.
    claim_armed: bool,
    last_verdict: Option<bool>,
    winners: Vec<PlayerId>,
}

impl<T: Transport> MultiplayerGame<T> {
    /// A client in `Idle` with an empty board.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            phase: SyncPhase::Idle,
            identity: None,
            game_id: None,
            version: None,
            state: GameState::new(GameVersion::Classic.config(), Deck::default()),
            roster: Roster::new(),
            inbox: Inbox::new(),
            errors: FxHashMap::default(),
            claim_armed: false,
            last_verdict: None,
            winners: Vec::new(),
        }
    }

    // === Outbound requests ===

    /// Ask the server for a new room. Only from `Idle`.
    pub fn create_room(&mut self, nickname: Option<String>) -> bool {
        self.request_room(ClientMessage::CreateRoom { nickname })
    }

    /// Ask to join an existing room. Only from `Idle`.
    pub fn join_room(&mut self, room_id: RoomId, nickname: Option<String>) -> bool {
        self.request_room(ClientMessage::JoinRoom { room_id, nickname })
    }

    fn request_room(&mut self, message: ClientMessage) -> bool {
        if self.phase != SyncPhase::Idle {
            log::warn!("{} ignored in phase {:?}", message.kind(), self.phase);
            return false;
        }
        self.errors.clear();
        self.transport.send(&message);
        self.phase = SyncPhase::RoomPending;
        true
    }

    /// Ask the server to start a game. Only from `RoomReady`.
    pub fn start_game(&mut self, version: GameVersion) -> bool {
        let room_id = match (&self.identity, self.phase) {
            (Some(identity), SyncPhase::RoomReady) => identity.room_id,
            _ => {
                log::warn!("START_GAME ignored in phase {:?}", self.phase);
                return false;
            }
        };
        self.transport.send(&ClientMessage::StartGame {
            room_id,
            game_version: version,
        });
        true
    }

    /// Toggle a card on the board. Reaching `V` selected cards sends a claim.
    pub fn toggle_selection(&mut self, card: CardId) -> bool {
        if self.phase != SyncPhase::InGame {
            log::debug!("selection ignored in phase {:?}", self.phase);
            return false;
        }
        if !self.state.card(card).is_some_and(Card::is_in_play) {
            log::debug!("card {} is not on the board", card);
            return false;
        }
        let changed = self.state.toggle_selection(card);
        if changed {
            self.check_claim();
        }
        changed
    }

    // === Inbound ===

    /// Queue a decoded message. Applied on the next `settle`.
    pub fn receive(&mut self, message: ServerMessage) {
        self.inbox.push(message);
    }

    /// Decode and queue a frame. Bad frames are logged and skipped.
    pub fn receive_raw(&mut self, frame: &str) -> Result<(), ProtocolError> {
        match ServerMessage::decode(frame) {
            Ok(message) => {
                self.receive(message);
                Ok(())
            }
            Err(e) => {
                log::warn!("skipping inbound frame: {}", e);
                Err(e)
            }
        }
    }

    /// Apply every queued message not yet applied, in arrival order.
    ///
    /// Safe to call any number of times.
    pub fn settle(&mut self) {
        for message in self.inbox.take_pending() {
            self.apply(message);
        }
        self.check_claim();
    }

    fn apply(&mut self, message: ServerMessage) {
        if self.phase == SyncPhase::Over {
            log::debug!("game over, ignoring {}", message.kind());
            return;
        }

        match message {
            ServerMessage::CreatedRoom {
                room_id,
                player_id,
                nickname,
            } => self.apply_membership(room_id, player_id, nickname, true),
            ServerMessage::JoinedRoom {
                room_id,
                player_id,
                nickname,
            } => self.apply_membership(room_id, player_id, nickname, false),
            ServerMessage::LeftRoom { player_id } => {
                if !self.roster.set_connected(player_id, false) {
                    log::debug!("LEFT_ROOM for unknown {}", player_id);
                }
            }
            ServerMessage::StartedGame {
                game_id,
                game_version,
                deck,
                players,
            } => self.apply_start(game_id, game_version, deck, players),
            ServerMessage::ChangedGameState {
                game_id,
                deck,
                players,
            } => {
                if self.accepts_snapshot(game_id, "CHANGED_GAME_STATE") {
                    self.apply_snapshot(deck, players);
                }
            }
            ServerMessage::GameOver {
                game_id,
                deck,
                players,
            } => {
                if self.accepts_snapshot(game_id, "GAME_OVER")
                    && self.apply_snapshot(deck, players)
                {
                    self.state.reset_selection();
                    self.winners = self.roster.winners();
                    self.phase = SyncPhase::Over;
                    log::info!("game {} over, {} winner(s)", game_id, self.winners.len());
                }
            }
            ServerMessage::CheckSetResult { is_set } => {
                if self.phase != SyncPhase::InGame {
                    log::debug!("CHECK_SET_RESULT outside a game, skipping");
                    return;
                }
                self.state.reset_selection();
                self.last_verdict = Some(is_set);
            }
            ServerMessage::Error {
                ref_type,
                field,
                reason,
            } => {
                log::warn!("server refused {} ({}): {}", ref_type, field, reason);
                let room_request = matches!(
                    ref_type,
                    ClientMessageKind::CreateRoom | ClientMessageKind::JoinRoom
                );
                if room_request && self.phase == SyncPhase::RoomPending {
                    self.phase = SyncPhase::Idle;
                }
                self.errors.insert(field, FieldError { ref_type, reason });
            }
        }
    }

    fn apply_membership(
        &mut self,
        room_id: RoomId,
        player_id: PlayerId,
        nickname: String,
        created: bool,
    ) {
        let known = self.identity.as_ref().map(|i| i.player_id);
        match known {
            None => {
                log::info!("joined {} as {}", room_id, player_id);
                self.roster = Roster::new();
                self.roster.insert(Player::new(player_id, nickname.clone()));
                self.identity = Some(Identity {
                    player_id,
                    room_id,
                    nickname,
                    is_owner: created,
                });
                self.phase = SyncPhase::RoomReady;
            }
            Some(own) if own == player_id || created => {
                log::debug!("identity already set, ignoring reply for {}", player_id);
            }
            Some(_) => {
                if self.phase == SyncPhase::RoomReady {
                    self.roster.insert(Player::new(player_id, nickname));
                }
            }
        }
    }

    fn apply_start(
        &mut self,
        game_id: GameId,
        version: GameVersion,
        deck: Vec<WireCard>,
        players: Roster,
    ) {
        if self.phase != SyncPhase::RoomReady {
            log::warn!("STARTED_GAME in phase {:?}, skipping", self.phase);
            return;
        }

        let config = version.config();
        match decode_deck(deck, &config) {
            Ok(mut deck) => {
                deck.iter_mut().for_each(|card| card.selected = false);
                self.state = GameState::new(config, deck);
                self.roster = players;
                self.game_id = Some(game_id);
                self.version = Some(version);
                self.last_verdict = None;
                self.claim_armed = false;
                self.phase = SyncPhase::InGame;
                log::info!("game {} started ({})", game_id, version);
            }
            Err(e) => log::warn!("discarding STARTED_GAME: {}", e),
        }
    }

    fn accepts_snapshot(&self, game_id: GameId, kind: &str) -> bool {
        if self.phase != SyncPhase::InGame {
            log::warn!("{} in phase {:?}, skipping", kind, self.phase);
            return false;
        }
        if self.game_id != Some(game_id) {
            log::warn!("stale {} for {}, skipping", kind, game_id);
            return false;
        }
        true
    }

    /// Replace deck and roster. Local selection survives only on cards still
    /// in play.
    fn apply_snapshot(&mut self, deck: Vec<WireCard>, players: Roster) -> bool {
        let local = self.state.selected_ids();
        match decode_deck(deck, self.state.config()) {
            Ok(mut deck) => {
                for card in deck.iter_mut() {
                    card.selected = card.is_in_play() && local.contains(&card.id);
                }
                self.state.replace_deck(deck);
                self.roster = players;
                true
            }
            Err(e) => {
                log::warn!("discarding snapshot: {}", e);
                false
            }
        }
    }

    /// Send a claim when the selection first reaches `V`.
    fn check_claim(&mut self) {
        let selected = self.state.selected_ids();
        if selected.len() != self.state.config().variation_count() {
            self.claim_armed = false;
            return;
        }
        if self.claim_armed || self.phase != SyncPhase::InGame {
            return;
        }
        self.claim_armed = true;

        let (Some(identity), Some(game_id)) = (&self.identity, self.game_id) else {
            log::error!("cannot claim without identity and game");
            return;
        };
        let claim = ClientMessage::CheckSet {
            card_ids: selected,
            player_id: identity.player_id,
            room_id: identity.room_id,
            game_id,
        };
        log::debug!("claiming set in game {}", game_id);
        self.transport.send(&claim);
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    #[must_use]
    pub fn version(&self) -> Option<GameVersion> {
        self.version
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    /// Server refusals keyed by field.
    #[must_use]
    pub fn errors(&self) -> &FxHashMap<String, FieldError> {
        &self.errors
    }

    /// Verdict on the most recent claim, if any arrived this game.
    #[must_use]
    pub fn last_verdict(&self) -> Option<bool> {
        self.last_verdict
    }

    /// Players at the top score once the game is over.
    #[must_use]
    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }
}

impl<T: Transport> GameEngine for MultiplayerGame<T> {
    fn state(&self) -> &GameState {
        &self.state
    }

    fn apply_local_selection(&mut self, card: CardId) -> bool {
        self.toggle_selection(card)
    }

    fn settle(&mut self) {
        MultiplayerGame::settle(self);
    }

    fn result(&self) -> Option<GameResult> {
        (self.phase == SyncPhase::Over).then(|| GameResult::Winners(self.winners.clone()))
    }
}

/// Feed inbound frames into `game` until the channel closes or the game ends.
pub async fn drive<T: Transport>(
    game: &mut MultiplayerGame<T>,
    inbound: &mut UnboundedReceiver<String>,
) {
    while let Some(frame) = inbound.recv().await {
        // Bad frames are logged inside `receive_raw`.
        let _ = game.receive_raw(&frame);
        game.settle();
        if game.phase() == SyncPhase::Over {
            return;
        }
    }
    log::info!("inbound channel closed in phase {:?}", game.phase());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{encode_deck, ChannelTransport};

    struct Session {
        game: MultiplayerGame<ChannelTransport>,
        sent: tokio::sync::mpsc::UnboundedReceiver<String>,
        player: PlayerId,
        game_id: GameId,
        deck: Deck,
    }

    fn drain_sent(session: &mut Session) -> Vec<ClientMessage> {
        let mut out = Vec::new();
        while let Ok(frame) = session.sent.try_recv() {
            out.push(ClientMessage::decode(&frame).unwrap());
        }
        out
    }

    fn started() -> Session {
        let (transport, sent) = ChannelTransport::pair();
        let mut game = MultiplayerGame::new(transport);
        let player = PlayerId::fresh();
        let game_id = GameId::fresh();

        game.create_room(Some("ann".to_string()));
        game.receive(ServerMessage::CreatedRoom {
            room_id: RoomId::fresh(),
            player_id: player,
            nickname: "ann".to_string(),
        });
        game.settle();

        let config = GameVersion::Classic.config();
        let mut deck = Deck::generate(&config);
        deck.iter_mut().take(12).for_each(|c| c.visible = true);
        game.receive(ServerMessage::StartedGame {
            game_id,
            game_version: GameVersion::Classic,
            deck: encode_deck(&deck),
            players: [Player::new(player, "ann")].into_iter().collect(),
        });
        game.settle();

        let mut session = Session {
            game,
            sent,
            player,
            game_id,
            deck,
        };
        drain_sent(&mut session);
        session
    }

    #[test]
    fn test_room_flow() {
        let session = started();
        assert_eq!(session.game.phase(), SyncPhase::InGame);
        assert_eq!(session.game.identity().unwrap().player_id, session.player);
        assert!(session.game.identity().unwrap().is_owner);
        assert_eq!(session.game.state().in_play().len(), 12);
        assert_eq!(session.game.version(), Some(GameVersion::Classic));
    }

    #[test]
    fn test_claim_is_edge_triggered() {
        let mut session = started();
        let board: Vec<CardId> = session.deck.ids().take(3).collect();

        for id in &board {
            session.game.toggle_selection(*id);
        }
        session.game.settle();
        session.game.settle();

        let claims = drain_sent(&mut session);
        assert_eq!(claims.len(), 1);
        match &claims[0] {
            ClientMessage::CheckSet {
                card_ids,
                player_id,
                game_id,
                ..
            } => {
                assert_eq!(card_ids, &board);
                assert_eq!(*player_id, session.player);
                assert_eq!(*game_id, session.game_id);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_claim_rearms_after_deselect() {
        let mut session = started();
        let board: Vec<CardId> = session.deck.ids().take(3).collect();

        for id in &board {
            session.game.toggle_selection(*id);
        }
        session.game.toggle_selection(board[2]);
        session.game.toggle_selection(board[2]);

        assert_eq!(drain_sent(&mut session).len(), 2);
    }

    #[test]
    fn test_check_set_result_clears_selection() {
        let mut session = started();
        let first = session.deck.ids().next().unwrap();
        session.game.toggle_selection(first);

        session.game.receive(ServerMessage::CheckSetResult { is_set: false });
        session.game.settle();

        assert!(session.game.state().selected().is_empty());
        assert_eq!(session.game.last_verdict(), Some(false));
        assert_eq!(session.game.state().in_play().len(), 12);
    }

    #[test]
    fn test_error_returns_pending_request_to_idle() {
        let (transport, _sent) = ChannelTransport::pair();
        let mut game = MultiplayerGame::new(transport);
        game.join_room(RoomId::fresh(), Some("bo".to_string()));
        assert_eq!(game.phase(), SyncPhase::RoomPending);

        game.receive(ServerMessage::error(
            ClientMessageKind::JoinRoom,
            "roomID",
            "Room doesn't exist",
        ));
        game.settle();

        assert_eq!(game.phase(), SyncPhase::Idle);
        assert_eq!(
            game.errors().get("roomID").map(|e| e.reason.as_str()),
            Some("Room doesn't exist")
        );
    }

    #[test]
    fn test_selection_outside_game_is_ignored() {
        let (transport, _sent) = ChannelTransport::pair();
        let mut game = MultiplayerGame::new(transport);
        assert!(!game.toggle_selection(CardId::fresh()));
        assert!(!game.start_game(GameVersion::Classic));
    }

    #[test]
    fn test_selection_off_the_board_is_ignored() {
        let mut session = started();
        let face_down = session.deck.ids().nth(12).unwrap();

        assert!(!session.game.toggle_selection(face_down));
        assert!(session.game.state().selected().is_empty());
        assert!(drain_sent(&mut session).is_empty());
    }

    #[test]
    fn test_result_reports_winners() {
        let mut session = started();
        assert_eq!(session.game.result(), None);

        let mut winner = Player::new(session.player, "ann");
        winner.score = 3;
        session.game.receive(ServerMessage::GameOver {
            game_id: session.game_id,
            deck: encode_deck(&session.deck),
            players: [winner].into_iter().collect(),
        });
        session.game.settle();

        assert_eq!(
            session.game.result(),
            Some(GameResult::Winners(vec![session.player]))
        );
    }
}
