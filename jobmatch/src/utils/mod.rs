//! Small shared helpers: clocks, timestamps, ids and text normalisation.

pub mod text;
pub mod timestamps;

pub use text::{char_len, collapse_whitespace, dedup_preserving_order, truncate_chars};
pub use timestamps::{format_iso8601, Clock, FixedClock, SystemClock, Timestamp};

use uuid::Uuid;

/// Generates a new UUID v4.
#[must_use]
pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}
