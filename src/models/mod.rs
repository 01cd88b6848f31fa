pub mod query;
pub mod skill;
pub mod skill_history;
pub mod stats;
pub mod user;

pub use query::*;
pub use skill::*;
pub use skill_history::*;
pub use stats::*;
pub use user::*;

use time::OffsetDateTime;

/// Current UTC time truncated to millisecond precision (the resolution of
/// BSON dates), so stored and in-memory timestamps compare equal.
pub fn timestamp_now() -> OffsetDateTime {
    truncate_to_millis(OffsetDateTime::now_utc())
}

pub fn truncate_to_millis(at: OffsetDateTime) -> OffsetDateTime {
    let millis = at.nanosecond() / 1_000_000;
    at.replace_nanosecond(millis * 1_000_000).unwrap_or(at)
}
