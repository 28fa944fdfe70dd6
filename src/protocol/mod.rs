//! Protocol module - wire message shapes and the JSON codec.
//!
//! Six self-describing message shapes travel between coordinator and
//! worker, discriminated by a `type` field:
//! - Inbound (coordinator to worker): `claim`, `load`
//! - Outbound (worker to coordinator): `release`, `requeue`, `queue`, `mark`
//!
//! Decoding is strict: a frame that is not a JSON object, lacks a string
//! `type`, or carries wrongly typed fields invalidates the whole frame.
//! Unknown fields are tolerated; unknown string `type` values decode to
//! a no-op.

mod message;

pub use message::{decode_inbound, Inbound, Outbound};
