//! Wire message types and the strict JSON codec.
//!
//! Inbound frames are decoded in two stages, matching the coordinator's
//! own codec: first a probe of the `type` discriminator, then a strict
//! per-type decode of the same bytes. The probe rejects anything that is
//! not a JSON object with a string `type`; the per-type decode rejects
//! wrongly typed fields (a non-string element in `objects`, a negative or
//! fractional `size`). Unknown string types decode to `None` so newer
//! coordinators can add message kinds without breaking older workers.

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};

/// Messages the worker sends to the coordinator.
///
/// The `mark` shape carries its watermark under a `size` field; that is
/// the field name the coordinator reads, not a copy of the `load` request
/// size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    /// Objects released back to the pool for reassignment.
    Release { objects: Vec<String> },
    /// Objects kept claimed by this worker for a future pass.
    Requeue { objects: Vec<String> },
    /// One group of newly loaded objects.
    Queue { group: String, objects: Vec<String> },
    /// Loading watermark, sent after all `queue` messages of a load.
    Mark { size: u32 },
}

impl Outbound {
    /// Encode to the JSON text form sent over the transport.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Messages the worker accepts from the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A batch of objects claimed for this worker.
    Claim { objects: Vec<String> },
    /// A request to load new objects into the pool.
    Load { size: u32 },
}

/// First-stage decode: only the discriminator.
#[derive(Deserialize)]
struct TypeProbe {
    #[serde(rename = "type")]
    kind: String,
}

/// Second-stage decode for `claim` frames.
#[derive(Deserialize)]
struct ClaimFields {
    objects: Vec<String>,
}

/// Second-stage decode for `load` frames.
#[derive(Deserialize)]
struct LoadFields {
    size: u32,
}

/// Decode one inbound frame.
///
/// Returns `Ok(None)` for a well-formed frame whose `type` is not one the
/// worker handles. Any shape violation is an error; the session treats it
/// as a protocol violation and disjoins.
pub fn decode_inbound(bytes: &[u8]) -> Result<Option<Inbound>> {
    let probe: TypeProbe = serde_json::from_slice(bytes)
        .map_err(|e| PoolError::Protocol(format!("invalid frame: {}", e)))?;

    match probe.kind.as_str() {
        "claim" => {
            let fields: ClaimFields = serde_json::from_slice(bytes)
                .map_err(|e| PoolError::Protocol(format!("invalid claim frame: {}", e)))?;
            Ok(Some(Inbound::Claim {
                objects: fields.objects,
            }))
        }
        "load" => {
            let fields: LoadFields = serde_json::from_slice(bytes)
                .map_err(|e| PoolError::Protocol(format!("invalid load frame: {}", e)))?;
            Ok(Some(Inbound::Load { size: fields.size }))
        }
        _ => Ok(None),
    }
}
