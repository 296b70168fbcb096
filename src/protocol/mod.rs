//! Wire protocol: tagged JSON messages, card payloads, and the transport seam.

pub mod error;
pub mod messages;
pub mod transport;
pub mod wire;

pub use error::ProtocolError;
pub use messages::{ClientMessage, ClientMessageKind, ServerMessage};
pub use transport::{ChannelTransport, ConnectionStatus, Transport};
pub use wire::{decode_deck, encode_deck, WireCard};
