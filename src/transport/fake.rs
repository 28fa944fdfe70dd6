//! In-memory transport for session tests.
//!
//! Mirrors the parts a real transport hands the session: a sink the
//! session writes to and a frame channel it reads from. The controller
//! on the other side injects inbound frames, observes outbound messages
//! in send order, counts closes, and can flip sends into failure or end
//! the inbound stream to simulate a peer close.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::{MessageSink, TransportParts};
use crate::error::Result;
use crate::handler::BoxFuture;

struct Shared {
    fail_sends: AtomicBool,
    closes: AtomicUsize,
}

struct FakeSink {
    sent_tx: mpsc::UnboundedSender<String>,
    shared: Arc<Shared>,
}

impl MessageSink for FakeSink {
    fn send(&mut self, text: String) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if self.shared.fail_sends.load(Ordering::SeqCst) {
                return Err(std::io::Error::other("simulated send failure").into());
            }
            let _ = self.sent_tx.send(text);
            Ok(())
        })
    }

    fn close(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.shared.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

/// Test-side handle to a fake transport.
pub(crate) struct FakeTransportController {
    frame_tx: Option<mpsc::Sender<Vec<u8>>>,
    sent_rx: mpsc::UnboundedReceiver<String>,
    shared: Arc<Shared>,
}

impl FakeTransportController {
    /// Inject one inbound frame.
    pub(crate) async fn inject(&self, frame: impl Into<Vec<u8>>) {
        if let Some(tx) = &self.frame_tx {
            let _ = tx.send(frame.into()).await;
        }
    }

    /// End the inbound stream, as a peer close would.
    pub(crate) fn close_inbound(&mut self) {
        self.frame_tx = None;
    }

    /// Make every subsequent send fail.
    pub(crate) fn fail_sends(&self) {
        self.shared.fail_sends.store(true, Ordering::SeqCst);
    }

    /// Await the next outbound message, parsed as JSON.
    pub(crate) async fn next_sent(&mut self) -> Option<serde_json::Value> {
        self.sent_rx
            .recv()
            .await
            .map(|text| serde_json::from_str(&text).unwrap())
    }

    /// Non-blocking poll of the outbound queue.
    pub(crate) fn try_next_sent(&mut self) -> Option<String> {
        self.sent_rx.try_recv().ok()
    }

    /// Number of times the session closed the sink.
    pub(crate) fn close_count(&self) -> usize {
        self.shared.closes.load(Ordering::SeqCst)
    }

    /// True once the session dropped its end of the frame stream.
    pub(crate) fn receiver_gone(&self) -> bool {
        self.frame_tx.as_ref().map(|tx| tx.is_closed()).unwrap_or(true)
    }
}

/// Build a fake transport and its controlling handle.
pub(crate) fn fake_transport() -> (TransportParts, FakeTransportController) {
    let (frame_tx, frame_rx) = mpsc::channel(64);
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    let shared = Arc::new(Shared {
        fail_sends: AtomicBool::new(false),
        closes: AtomicUsize::new(0),
    });

    let parts = TransportParts {
        sink: Box::new(FakeSink {
            sent_tx,
            shared: shared.clone(),
        }),
        frames: frame_rx,
    };
    let controller = FakeTransportController {
        frame_tx: Some(frame_tx),
        sent_rx,
        shared,
    };

    (parts, controller)
}
