//! Wire messages between client and server.
//!
//! Every frame is a JSON object with a `type` discriminator. Frames are
//! checked for a known `type` before the body is parsed, so an unknown kind
//! is reported as such instead of as a shape error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProtocolError;
use super::wire::WireCard;
use crate::core::config::GameVersion;
use crate::core::ids::{CardId, GameId, PlayerId, RoomId};
use crate::core::player::Roster;

/// Messages sent from client to server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Open a new room owned by the sender.
    CreateRoom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nickname: Option<String>,
    },
    /// Enter an existing room.
    JoinRoom {
        #[serde(rename = "roomID")]
        room_id: RoomId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nickname: Option<String>,
    },
    /// Owner starts a game in the room.
    StartGame {
        #[serde(rename = "roomID")]
        room_id: RoomId,
        #[serde(rename = "gameVersion")]
        game_version: GameVersion,
    },
    /// Claim that the listed cards form a Set.
    CheckSet {
        #[serde(rename = "cardIDs")]
        card_ids: Vec<CardId>,
        #[serde(rename = "playerID")]
        player_id: PlayerId,
        #[serde(rename = "roomID")]
        room_id: RoomId,
        #[serde(rename = "gameID")]
        game_id: GameId,
    },
}

/// Discriminator of a `ClientMessage`, echoed back in `ERROR` frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessageKind {
    CreateRoom,
    JoinRoom,
    StartGame,
    CheckSet,
    /// A request type this client does not send, such as `RECONNECT_TO_ROOM`.
    #[serde(other)]
    Other,
}

impl ClientMessageKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateRoom => "CREATE_ROOM",
            Self::JoinRoom => "JOIN_ROOM",
            Self::StartGame => "START_GAME",
            Self::CheckSet => "CHECK_SET",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for ClientMessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ClientMessage {
    const KINDS: [&'static str; 4] = ["CREATE_ROOM", "JOIN_ROOM", "START_GAME", "CHECK_SET"];

    #[must_use]
    pub fn kind(&self) -> ClientMessageKind {
        match self {
            Self::CreateRoom { .. } => ClientMessageKind::CreateRoom,
            Self::JoinRoom { .. } => ClientMessageKind::JoinRoom,
            Self::StartGame { .. } => ClientMessageKind::StartGame,
            Self::CheckSet { .. } => ClientMessageKind::CheckSet,
        }
    }

    /// Serialize to a JSON frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Parse a JSON frame.
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        decode_tagged(frame, &Self::KINDS)
    }
}

/// Messages sent from server to client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Reply to `CREATE_ROOM`.
    CreatedRoom {
        #[serde(rename = "roomID")]
        room_id: RoomId,
        #[serde(rename = "playerID")]
        player_id: PlayerId,
        nickname: String,
    },
    /// Reply to `JOIN_ROOM`, and the announcement of any room member.
    JoinedRoom {
        #[serde(rename = "roomID")]
        room_id: RoomId,
        #[serde(rename = "playerID")]
        player_id: PlayerId,
        nickname: String,
    },
    /// A member dropped out.
    LeftRoom {
        #[serde(rename = "playerID")]
        player_id: PlayerId,
    },
    /// A game began.
    StartedGame {
        #[serde(rename = "gameID")]
        game_id: GameId,
        #[serde(rename = "gameVersion")]
        game_version: GameVersion,
        deck: Vec<WireCard>,
        players: Roster,
    },
    /// Verdict on the receiver's last claim.
    CheckSetResult {
        #[serde(rename = "isSet")]
        is_set: bool,
    },
    /// Full snapshot after a successful claim.
    ChangedGameState {
        #[serde(rename = "gameID")]
        game_id: GameId,
        deck: Vec<WireCard>,
        players: Roster,
    },
    /// Final snapshot.
    GameOver {
        #[serde(rename = "gameID")]
        game_id: GameId,
        deck: Vec<WireCard>,
        players: Roster,
    },
    /// A request was refused.
    Error {
        #[serde(rename = "refType")]
        ref_type: ClientMessageKind,
        #[serde(default)]
        field: String,
        reason: String,
    },
}

impl ServerMessage {
    const KINDS: [&'static str; 8] = [
        "CREATED_ROOM",
        "JOINED_ROOM",
        "LEFT_ROOM",
        "STARTED_GAME",
        "CHECK_SET_RESULT",
        "CHANGED_GAME_STATE",
        "GAME_OVER",
        "ERROR",
    ];

    /// Wire discriminator.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreatedRoom { .. } => "CREATED_ROOM",
            Self::JoinedRoom { .. } => "JOINED_ROOM",
            Self::LeftRoom { .. } => "LEFT_ROOM",
            Self::StartedGame { .. } => "STARTED_GAME",
            Self::CheckSetResult { .. } => "CHECK_SET_RESULT",
            Self::ChangedGameState { .. } => "CHANGED_GAME_STATE",
            Self::GameOver { .. } => "GAME_OVER",
            Self::Error { .. } => "ERROR",
        }
    }

    pub fn error(ref_type: ClientMessageKind, field: &str, reason: &str) -> Self {
        Self::Error {
            ref_type,
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Serialize to a JSON frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Parse a JSON frame.
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        decode_tagged(frame, &Self::KINDS)
    }
}

fn decode_tagged<T: DeserializeOwned>(frame: &str, kinds: &[&str]) -> Result<T, ProtocolError> {
    let value: Value =
        serde_json::from_str(frame).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;
    if !kinds.contains(&kind) {
        return Err(ProtocolError::UnknownType(kind.to_string()));
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
}
