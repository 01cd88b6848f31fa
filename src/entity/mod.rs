//! BSON document shapes stored in MongoDB, and conversions to and from the
//! domain models.

pub mod skill;
pub mod skill_history;
pub mod user;

pub use skill::{ResourceDocument, SkillDocument};
pub use skill_history::{SkillHistoryDocument, SnapshotDocument};
pub use user::UserDocument;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub fn to_bson_datetime(at: OffsetDateTime) -> bson::DateTime {
    bson::DateTime::from_millis((at.unix_timestamp_nanos() / 1_000_000) as i64)
}

pub fn from_bson_datetime(at: bson::DateTime) -> AppResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(at.timestamp_millis()) * 1_000_000)
        .map_err(|e| AppError::Internal(format!("Stored date out of range: {}", e)))
}

pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::Internal(format!("Stored {} id is invalid: {}", what, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_datetime_round_trip_keeps_millis() {
        let at = datetime!(2024-03-01 12:30:45.123 UTC);
        let back = from_bson_datetime(to_bson_datetime(at)).unwrap();
        assert_eq!(back, at);
    }
}
