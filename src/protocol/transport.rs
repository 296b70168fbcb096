//! Outbound transport seam.
//!
//! The client only needs an ordered channel it can push frames into. Sends
//! are fire-and-forget: if the channel isn't open the frame is logged and
//! dropped, with no retry.
//!
//! `ChannelTransport` is the in-process implementation over a tokio unbounded
//! channel; a socket adapter implements the same trait.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::error::ProtocolError;
use super::messages::ClientMessage;

/// Connection state as seen by the sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Open,
    Closed,
}

/// Ordered outbound channel.
pub trait Transport {
    /// Current connection state.
    fn status(&self) -> ConnectionStatus;

    /// Push an encoded frame. Only called while `Open`.
    fn deliver(&mut self, frame: String) -> Result<(), ProtocolError>;

    /// Encode and send a message, dropping it if the channel isn't open.
    fn send(&mut self, message: &ClientMessage) {
        if self.status() != ConnectionStatus::Open {
            log::error!("transport not open, dropping {}", message.kind());
            return;
        }

        let delivered = message.encode().and_then(|frame| self.deliver(frame));
        if let Err(e) = delivered {
            log::error!("failed to send {}: {}", message.kind(), e);
        }
    }
}

/// Transport over a tokio unbounded channel.
#[derive(Debug)]
pub struct ChannelTransport {
    outbound: UnboundedSender<String>,
    closed: bool,
}

impl ChannelTransport {
    #[must_use]
    pub fn new(outbound: UnboundedSender<String>) -> Self {
        Self {
            outbound,
            closed: false,
        }
    }

    /// A transport plus the receiving end of its frames.
    #[must_use]
    pub fn pair() -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Stop sending. Later sends are dropped.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for ChannelTransport {
    fn status(&self) -> ConnectionStatus {
        if self.closed || self.outbound.is_closed() {
            ConnectionStatus::Closed
        } else {
            ConnectionStatus::Open
        }
    }

    fn deliver(&mut self, frame: String) -> Result<(), ProtocolError> {
        self.outbound
            .send(frame)
            .map_err(|_| ProtocolError::ChannelClosed)
    }
}
