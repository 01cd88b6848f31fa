use async_trait::async_trait;
use bson::doc;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::entity::{user::COLLECTION, UserDocument};
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::repositories::UserRepository;

/// User repository for MongoDB
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: &User) -> AppResult<()> {
        self.collection
            .insert_one(UserDocument::from(user))
            .await
            .map_err(|e| {
                if e.to_string().contains("duplicate key") {
                    AppError::Conflict("User".to_string())
                } else {
                    AppError::Database(e.to_string())
                }
            })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        document.try_into()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let document = self
            .collection
            .find_one(doc! { "email": email })
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        document.try_into()
    }
}
