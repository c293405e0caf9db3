//! ID generation and clock helpers.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Maximum fresh draws before giving up on a collision-free id.
const MAX_ID_ATTEMPTS: usize = 16;

/// Generate a new issue id (UUID v4, hyphenated lowercase).
///
/// The `exists` closure checks for collisions within the target project;
/// a colliding draw is discarded and another is taken.
#[must_use]
pub fn generate_id<F>(exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut id = Uuid::new_v4().to_string();
    for _ in 1..MAX_ID_ATTEMPTS {
        if !exists(&id) {
            break;
        }
        tracing::warn!(%id, "issue id collision; drawing again");
        id = Uuid::new_v4().to_string();
    }
    id
}

/// Current time at millisecond precision.
///
/// Persisted timestamps carry milliseconds, so truncating here keeps the
/// in-memory record identical to what a later load returns.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
