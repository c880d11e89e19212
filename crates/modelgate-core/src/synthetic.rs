//! Synthetic identifiers and timestamps
//!
//! Some upstreams (the managed-inference provider in particular) return bare
//! generation lists without a response id or creation time. Adapters fill those
//! fields with the helpers here; upstream-supplied values always pass through
//! untouched.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Synthesize a chat completion id of the form `chatcmpl-<uuid>`.
pub fn completion_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4())
}

/// Current unix time in seconds.
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
