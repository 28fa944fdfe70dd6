//! # objectpool-client
//!
//! Rust worker-side client for a distributed object pool.
//!
//! A worker joins a named pool on a coordinator over a WebSocket. The
//! coordinator claims batches of opaque object identifiers for the worker
//! and may ask it to load new objects into named groups; the worker
//! reports back which objects to release versus requeue, and tags loaded
//! objects with a progress mark.
//!
//! ## Architecture
//!
//! - **Join** (`Session::builder`): endpoint plus `pool`/`limit` query
//!   parameters, WebSocket handshake, then a listening session
//! - **Session**: validates every inbound frame, spawns one task per
//!   claim/load, and tears down on the first failure
//! - **Callbacks**: a [`Processor`] for claimed batches and a [`Loader`]
//!   for load requests; both accept plain async closures
//!
//! ## Example
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
//!         .processor(|claim: Claimed| async move {
//!             println!("claimed: {:?}", claim.objects);
//!             Ok(None)
//!         })
//!         .join()
//!         .await?;
//!
//!     // Runs until the coordinator closes the connection.
//!     session.completed().await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handler;
pub mod protocol;
pub mod transport;

mod join;
mod session;

pub use error::{PoolError, Result};
pub use handler::{ClaimResult, Claimed, LoadRequest, Loader, Mark, Processor};
pub use join::SessionBuilder;
pub use session::Session;
