use serde::{Deserialize, Serialize};

use crate::entity::{from_bson_datetime, parse_id, to_bson_datetime};
use crate::error::AppResult;
use crate::models::User;

pub const COLLECTION: &str = "users";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
            created_at: to_bson_datetime(user.created_at),
            updated_at: to_bson_datetime(user.updated_at),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = crate::error::AppError;

    fn try_from(doc: UserDocument) -> AppResult<Self> {
        Ok(Self {
            id: parse_id(&doc.id, "user")?,
            name: doc.name,
            email: doc.email,
            password_hash: doc.password,
            created_at: from_bson_datetime(doc.created_at)?,
            updated_at: from_bson_datetime(doc.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timestamp_now;
    use uuid::Uuid;

    #[test]
    fn test_user_bson_round_trip() {
        let now = timestamp_now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$hash".to_string(),
            created_at: now,
            updated_at: now,
        };

        let stored = bson::to_document(&UserDocument::from(&user)).unwrap();
        assert_eq!(stored.get_str("_id").unwrap(), user.id.to_string());
        assert_eq!(stored.get_str("password").unwrap(), user.password_hash);
        assert!(stored.get_datetime("createdAt").is_ok());

        let back = User::try_from(bson::from_document::<UserDocument>(stored).unwrap()).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.email, user.email);
        assert_eq!(back.password_hash, user.password_hash);
        assert_eq!(back.created_at, user.created_at);
        assert_eq!(back.updated_at, user.updated_at);
    }
}
