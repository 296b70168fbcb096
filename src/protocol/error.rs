use crate::core::ids::CardId;

/// Errors that can occur while decoding or sending wire messages.
///
/// None of these stop a session: the offending frame is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Not valid JSON, or a known message with the wrong shape.
    Malformed(String),
    /// No string `type` discriminator.
    MissingType,
    /// A `type` this side doesn't understand.
    UnknownType(String),
    /// A card whose features don't fit the active configuration.
    InvalidCard { card: CardId, reason: String },
    /// Serialization failed.
    Encode(String),
    /// The channel is gone.
    ChannelClosed,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed message: {}", s),
            Self::MissingType => write!(f, "message has no type"),
            Self::UnknownType(s) => write!(f, "unknown message type: {}", s),
            Self::InvalidCard { card, reason } => write!(f, "invalid card {}: {}", card, reason),
            Self::Encode(s) => write!(f, "encode failed: {}", s),
            Self::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ProtocolError {}
