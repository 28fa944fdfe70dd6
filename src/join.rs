//! Session join procedure and builder.
//!
//! The [`SessionBuilder`] carries the endpoint, the pool name, the claim
//! limit, and the two callbacks. `join()` appends `pool` and `limit` as
//! query parameters to the endpoint, performs the WebSocket handshake,
//! and hands the opened transport to the session, which is already
//! listening when the call returns.
//!
//! # Example
//!
//! ```ignore
//! use objectpool_client::{Claimed, LoadRequest, Mark, Session};
//!
//! let session = Session::builder("wss://coordinator.local/session")
//!     .pool("renders")
//!     .limit(4)
//!     .loader(|_request: LoadRequest| async move { Ok(Mark::new(0)) })
//!     .processor(|_claim: Claimed| async move { Ok(None) })
//!     .join()
//!     .await?;
//! ```

use std::sync::Arc;

use url::Url;

use crate::error::{PoolError, Result};
use crate::handler::{Loader, Processor};
use crate::session::Session;
use crate::transport;

/// Builder for joining a pool session.
///
/// Created through [`Session::builder`]. The pool name, loader, and
/// processor are required; `join()` fails without them.
pub struct SessionBuilder {
    endpoint: String,
    pool: Option<String>,
    limit: u16,
    loader: Option<Arc<dyn Loader>>,
    processor: Option<Arc<dyn Processor>>,
}

impl SessionBuilder {
    pub(crate) fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            pool: None,
            limit: 1,
            loader: None,
            processor: None,
        }
    }

    /// Set the pool to join. Required.
    pub fn pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    /// Set how many objects the coordinator may claim for this worker
    /// at once.
    ///
    /// Default: 1
    pub fn limit(mut self, limit: u16) -> Self {
        self.limit = limit;
        self
    }

    /// Set the loader callback. Required.
    pub fn loader(mut self, loader: impl Loader) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Set the processor callback. Required.
    pub fn processor(mut self, processor: impl Processor) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// Join the pool.
    ///
    /// Waits for the WebSocket handshake and returns a listening
    /// [`Session`]. A handshake failure is returned as an error; no
    /// session exists in that case.
    pub async fn join(self) -> Result<Session> {
        let pool = self.pool.ok_or(PoolError::Join("pool is required"))?;
        let loader = self.loader.ok_or(PoolError::Join("loader is required"))?;
        let processor = self
            .processor
            .ok_or(PoolError::Join("processor is required"))?;

        let target = build_target(&self.endpoint, &pool, self.limit)?;
        tracing::debug!("Joining pool {} via {}", pool, target);

        let transport = transport::connect(target.as_str()).await?;

        Ok(Session::attach(transport, loader, processor))
    }
}

/// Append `pool` and `limit` to the endpoint as query parameters,
/// preserving anything already present.
fn build_target(endpoint: &str, pool: &str, limit: u16) -> Result<Url> {
    let mut target = Url::parse(endpoint)?;
    target
        .query_pairs_mut()
        .append_pair("pool", pool)
        .append_pair("limit", &limit.to_string());
    Ok(target)
}
