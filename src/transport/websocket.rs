//! WebSocket transport over tokio-tungstenite.
//!
//! [`connect`] performs the handshake and splits the stream: the sink
//! half becomes the session's [`MessageSink`], while a pump task forwards
//! received text/binary frames into the frame channel. Ping/pong stays
//! inside tungstenite; a close frame or read error ends the pump, which
//! drops the channel sender and thereby notifies the session.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{MessageSink, TransportParts};
use crate::error::Result;
use crate::handler::BoxFuture;

/// Capacity of the inbound frame channel.
const FRAME_CHANNEL_CAPACITY: usize = 64;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Outbound half of a connected WebSocket.
struct WebSocketSink {
    sink: SplitSink<WsStream, Message>,
}

impl MessageSink for WebSocketSink {
    fn send(&mut self, text: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.sink.send(Message::Text(text)).await?;
            Ok(())
        })
    }

    fn close(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.sink.close().await?;
            Ok(())
        })
    }
}

/// Connect to the given target and split the stream for session use.
///
/// Resolves once the WebSocket handshake completes; a handshake failure
/// is returned to the caller and no transport is produced.
pub async fn connect(target: &str) -> Result<TransportParts> {
    let (stream, _response) = connect_async(target).await?;
    tracing::debug!("WebSocket connected to {}", target);

    let (sink, mut reader) = stream.split();
    let (frame_tx, frame_rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        while let Some(next) = reader.next().await {
            let frame = match next {
                Ok(Message::Text(text)) => text.into_bytes(),
                Ok(Message::Binary(data)) => data,
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!("WebSocket read ended: {}", e);
                    break;
                }
            };

            if frame_tx.send(frame).await.is_err() {
                // Session dropped its receiver; stop pumping.
                break;
            }
        }
    });

    Ok(TransportParts {
        sink: Box::new(WebSocketSink { sink }),
        frames: frame_rx,
    })
}
