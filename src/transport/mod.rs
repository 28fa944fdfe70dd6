//! Transport module - the duplex message channel under a session.
//!
//! An established transport is split into two halves:
//! - a [`MessageSink`] for outbound text frames (send/close)
//! - an inbound frame stream delivered through an mpsc receiver
//!
//! Closure of the frame stream is the close notification: when the peer
//! closes or the read side fails, the pump drops its sender and the
//! session observes the end of the stream.

mod websocket;

#[cfg(test)]
pub(crate) mod fake;

pub use websocket::connect;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::handler::BoxFuture;

/// Outbound half of an established transport.
///
/// Each send is an independent operation that resolves once the
/// transport has accepted the frame; the session never batches sends.
pub trait MessageSink: Send + 'static {
    /// Send one text frame.
    fn send(&mut self, text: String) -> BoxFuture<'_, Result<()>>;

    /// Close the transport.
    fn close(&mut self) -> BoxFuture<'_, Result<()>>;
}

/// An established transport, split for the session's use.
pub struct TransportParts {
    /// Outbound sink, shared by all in-flight handlers through the session.
    pub sink: Box<dyn MessageSink>,
    /// Inbound frames; the channel closing signals transport close.
    pub frames: mpsc::Receiver<Vec<u8>>,
}
