//! MongoDB-backed repositories

mod skill;
mod skill_history;
mod user;

pub use skill::MongoSkillRepository;
pub use skill_history::MongoSkillHistoryRepository;
pub use user::MongoUserRepository;

use bson::doc;
use mongodb::{options::IndexOptions, Database, IndexModel};

use crate::entity::{SkillDocument, SkillHistoryDocument, UserDocument};
use crate::error::AppResult;

/// Create the indexes every query relies on. Safe to run on each start.
pub async fn ensure_indexes(db: &Database) -> AppResult<()> {
    db.collection::<UserDocument>(crate::entity::user::COLLECTION)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    db.collection::<SkillDocument>(crate::entity::skill::COLLECTION)
        .create_indexes(vec![
            IndexModel::builder()
                .keys(doc! { "user": 1, "category": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "user": 1, "proficiencyLevel": 1 })
                .build(),
        ])
        .await?;

    db.collection::<SkillHistoryDocument>(crate::entity::skill_history::COLLECTION)
        .create_indexes(vec![
            IndexModel::builder()
                .keys(doc! { "user": 1, "skill": 1, "createdAt": -1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "user": 1, "createdAt": -1 })
                .build(),
        ])
        .await?;

    tracing::debug!("MongoDB indexes ensured");
    Ok(())
}
