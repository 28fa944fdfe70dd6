//! Callback contracts supplied by the embedding application.
//!
//! A session drives two user-supplied callbacks: the [`Processor`] receives
//! batches of claimed objects and decides what to release, and the
//! [`Loader`] produces new objects when the coordinator asks for them.
//! Both are traits with blanket implementations for async closures, so a
//! plain `|claim: Claimed| async move { .. }` works without wrapper types.
//!
//! # Example
//!
//! ```ignore
//! use objectpool_client::{Claimed, ClaimResult, LoadRequest, Mark};
//!
//! let processor = |claim: Claimed| async move {
//!     // Release the first object, keep the rest claimed.
//!     Ok(Some(ClaimResult::release(claim.objects.into_iter().take(1))))
//! };
//!
//! let loader = |request: LoadRequest| async move {
//!     let fresh = (0..request.size).map(|i| format!("obj-{}", i));
//!     Ok(Mark::new(7).group("fresh", fresh))
//! };
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// Boxed future for callback results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A load request from the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    /// Number of new objects the coordinator asks this worker to produce.
    pub size: u32,
}

/// A batch of objects the coordinator has claimed for this worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claimed {
    /// Identifiers of the claimed objects.
    pub objects: Vec<String>,
}

/// Newly loaded objects plus the watermark reported back to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mark {
    /// Watermark the coordinator uses to track loading progress.
    pub mark: u32,
    /// Produced object identifiers, keyed by group name.
    ///
    /// Group order is not significant; order within a group is preserved
    /// on the wire.
    pub queue: HashMap<String, Vec<String>>,
}

impl Mark {
    /// Create a mark with an empty queue.
    pub fn new(mark: u32) -> Self {
        Self {
            mark,
            queue: HashMap::new(),
        }
    }

    /// Add a group of produced objects.
    pub fn group<I, S>(mut self, name: impl Into<String>, objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queue
            .insert(name.into(), objects.into_iter().map(Into::into).collect());
        self
    }
}

/// Outcome of processing a claimed batch.
///
/// Returned (optionally) by the [`Processor`]. When the processor returns
/// no result at all, the whole input batch is treated as released.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimResult {
    /// Objects to release back to the pool.
    ///
    /// `None` releases the entire claimed batch.
    pub release: Option<Vec<String>>,
}

impl ClaimResult {
    /// Release exactly the given objects.
    pub fn release<I, S>(objects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            release: Some(objects.into_iter().map(Into::into).collect()),
        }
    }
}

/// Loader callback: produces new objects for the pool on request.
pub trait Loader: Send + Sync + 'static {
    /// Produce a batch of new objects and a progress mark.
    fn load(&self, request: LoadRequest) -> BoxFuture<'static, Result<Mark>>;
}

impl<F, Fut> Loader for F
where
    F: Fn(LoadRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Mark>> + Send + 'static,
{
    fn load(&self, request: LoadRequest) -> BoxFuture<'static, Result<Mark>> {
        Box::pin(self(request))
    }
}

/// Processor callback: handles batches of claimed objects.
pub trait Processor: Send + Sync + 'static {
    /// Process a claimed batch.
    ///
    /// Returning `Ok(None)` releases the entire batch.
    fn process(&self, claim: Claimed) -> BoxFuture<'static, Result<Option<ClaimResult>>>;
}

impl<F, Fut> Processor for F
where
    F: Fn(Claimed) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<ClaimResult>>> + Send + 'static,
{
    fn process(&self, claim: Claimed) -> BoxFuture<'static, Result<Option<ClaimResult>>> {
        Box::pin(self(claim))
    }
}
