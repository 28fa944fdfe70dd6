//! Session state machine and claim/load handling.
//!
//! A [`Session`] owns one transport and runs a listener task that
//! validates every inbound frame and spawns one task per claim or load.
//! Handlers are not serialized: a slow callback stalls only its own task,
//! and outbound messages from different handlers may interleave on the
//! wire in completion order rather than arrival order.
//!
//! Lifecycle is Open then Disjoined. Disjoined is terminal: the listener
//! detaches from the transport, the sink is closed once, and a completion
//! notification fires for every waiter. All failures converge here and
//! nothing is retried; a supervisor is expected to rejoin externally.
//!
//! # Example
//!
//! ```ignore
//! use objectpool_client::{Claimed, LoadRequest, Mark, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::builder("ws://coordinator.local/session")
//!         .pool("renders")
//!         .limit(4)
//!         .loader(|request: LoadRequest| async move {
//!             let fresh = (0..request.size).map(|i| format!("obj-{}", i));
//!             Ok(Mark::new(1).group("fresh", fresh))
//!         })
//!         .processor(|_claim: Claimed| async move { Ok(None) })
//!         .join()
//!         .await?;
//!
//!     session.completed().await;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;

use crate::error::{PoolError, Result};
use crate::handler::{Claimed, LoadRequest, Loader, Processor};
use crate::join::SessionBuilder;
use crate::protocol::{decode_inbound, Inbound, Outbound};
use crate::transport::{MessageSink, TransportParts};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    /// Listening and accepting frames.
    Open,
    /// Terminal; transport detached, no further effects.
    Disjoined,
}

/// A joined pool session.
///
/// Created through [`Session::builder`]. Cheap to clone; all clones
/// observe the same lifecycle.
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    /// Start configuring a session against the given endpoint.
    pub fn builder(endpoint: impl Into<String>) -> SessionBuilder {
        SessionBuilder::new(endpoint)
    }

    /// Bind an opened transport and start listening.
    pub(crate) fn attach(
        transport: TransportParts,
        loader: Arc<dyn Loader>,
        processor: Arc<dyn Processor>,
    ) -> Self {
        let TransportParts { sink, frames } = transport;

        let shared = Arc::new(Shared {
            sink: AsyncMutex::new(sink),
            state: Mutex::new(Lifecycle::Open),
            disjoin: CancellationToken::new(),
            loader,
            processor,
        });

        tokio::spawn(shared.clone().listen(frames));

        Session { shared }
    }

    /// End the session immediately.
    ///
    /// Idempotent; callbacks already in flight are not aborted, but their
    /// sends are refused from this point on.
    pub fn disjoin(&self) {
        self.shared.disjoin();
    }

    /// True once the session has ended.
    pub fn is_disjoined(&self) -> bool {
        self.shared.is_disjoined()
    }

    /// Wait until the session ends (transport close, protocol error,
    /// handler failure, or an explicit [`Session::disjoin`]).
    ///
    /// Resolves immediately on an already-ended session; any number of
    /// waiters may observe the same completion.
    pub async fn completed(&self) {
        self.shared.disjoin.cancelled().await;
    }
}

struct Shared {
    /// Outbound half of the transport, shared by all in-flight handlers.
    sink: AsyncMutex<Box<dyn MessageSink>>,
    /// Lifecycle flag; only `disjoin` transitions it.
    state: Mutex<Lifecycle>,
    /// Completion signal observed by the listener and external waiters.
    disjoin: CancellationToken,
    loader: Arc<dyn Loader>,
    processor: Arc<dyn Processor>,
}

impl Shared {
    /// Transition to Disjoined and fire the completion signal once.
    fn disjoin(&self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *state == Lifecycle::Disjoined {
            return;
        }
        *state = Lifecycle::Disjoined;
        drop(state);

        tracing::debug!("Session disjoined");
        self.disjoin.cancel();
    }

    fn is_disjoined(&self) -> bool {
        let state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state == Lifecycle::Disjoined
    }

    /// Listener task: validate frames, dispatch handlers, tear down once.
    async fn listen(self: Arc<Self>, mut frames: mpsc::Receiver<Vec<u8>>) {
        loop {
            tokio::select! {
                _ = self.disjoin.cancelled() => break,
                next = frames.recv() => {
                    let Some(frame) = next else {
                        tracing::debug!("Transport closed by peer");
                        break;
                    };
                    match decode_inbound(&frame) {
                        Ok(Some(message)) => Self::dispatch(&self, message),
                        Ok(None) => {
                            tracing::debug!(
                                "Ignoring unhandled frame: {}",
                                String::from_utf8_lossy(&frame)
                            );
                        }
                        Err(e) => {
                            tracing::error!("Protocol error: {}", e);
                            break;
                        }
                    }
                }
            }
        }

        // Every exit path disjoins; repeat calls are no-ops.
        self.disjoin();

        // Detach: drop the frame subscription, then close the sink. Both
        // happen exactly once because only this task tears down.
        drop(frames);
        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.close().await {
            tracing::debug!("Transport close failed: {}", e);
        }
    }

    /// Route one validated message to its own handler task.
    ///
    /// The listener does not wait for the handler: a slow callback stalls
    /// only its task, and later frames keep dispatching.
    fn dispatch(shared: &Arc<Shared>, message: Inbound) {
        match message {
            Inbound::Claim { objects } => {
                tracing::debug!("Claim received for {} objects", objects.len());
                let task = shared.clone();
                tokio::spawn(async move {
                    let result = task.handle_claim(objects).await;
                    task.finish_handler("claim", result);
                });
            }
            Inbound::Load { size } => {
                tracing::debug!("Load requested for {} objects", size);
                let task = shared.clone();
                tokio::spawn(async move {
                    let result = task.handle_load(size).await;
                    task.finish_handler("load", result);
                });
            }
        }
    }

    /// Failure boundary for a spawned handler task.
    fn finish_handler(&self, kind: &str, result: Result<()>) {
        if let Err(e) = result {
            if self.is_disjoined() {
                tracing::debug!("{} handler ended after disjoin: {}", kind, e);
            } else {
                tracing::error!("{} handler failed: {}", kind, e);
                self.disjoin();
            }
        }
    }

    /// Process one claimed batch and report release/requeue.
    async fn handle_claim(&self, objects: Vec<String>) -> Result<()> {
        let outcome = self
            .processor
            .process(Claimed {
                objects: objects.clone(),
            })
            .await?;

        // No result from the processor means release the whole batch.
        let release = outcome
            .and_then(|r| r.release)
            .unwrap_or_else(|| objects.clone());

        if !release.is_empty() {
            self.send(&Outbound::Release {
                objects: release.clone(),
            })
            .await?;
        }

        // The coordinator expects requeue to carry the claimed objects
        // that also appear in release, not the remainder.
        let requeue = objects
            .into_iter()
            .filter(|object| release.contains(object))
            .collect();
        self.send(&Outbound::Requeue { objects: requeue }).await?;

        Ok(())
    }

    /// Run one load request and report queue groups plus the mark.
    async fn handle_load(&self, size: u32) -> Result<()> {
        let mark = self.loader.load(LoadRequest { size }).await?;

        for (group, objects) in mark.queue {
            self.send(&Outbound::Queue { group, objects }).await?;
        }

        // The watermark travels under a `size` field, after all groups.
        self.send(&Outbound::Mark { size: mark.mark }).await?;

        Ok(())
    }

    /// Send one outbound message, refusing after disjoin.
    async fn send(&self, message: &Outbound) -> Result<()> {
        if self.is_disjoined() {
            return Err(PoolError::Disjoined);
        }
        let text = message.encode()?;

        let mut sink = self.sink.lock().await;
        // Checked again under the sink lock; teardown closes under the
        // same lock, so nothing goes out after the transport is detached.
        if self.is_disjoined() {
            return Err(PoolError::Disjoined);
        }
        sink.send(text).await
    }
}
