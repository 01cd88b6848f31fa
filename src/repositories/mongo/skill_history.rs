use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::entity::{skill_history::COLLECTION, SkillHistoryDocument};
use crate::error::AppResult;
use crate::models::SkillHistory;
use crate::repositories::SkillHistoryRepository;

/// Skill history repository for MongoDB
#[derive(Clone)]
pub struct MongoSkillHistoryRepository {
    collection: Collection<SkillHistoryDocument>,
}

impl MongoSkillHistoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }
}

/// Newest first; entry ids are time-ordered, so `_id` breaks ties in write order
fn history_sort() -> Document {
    doc! { "createdAt": -1, "_id": -1 }
}

#[async_trait]
impl SkillHistoryRepository for MongoSkillHistoryRepository {
    async fn record(&self, entry: &SkillHistory) -> AppResult<()> {
        self.collection
            .insert_one(SkillHistoryDocument::from(entry))
            .await?;
        Ok(())
    }

    async fn list_by_skill(&self, skill_id: Uuid) -> AppResult<Vec<SkillHistory>> {
        let documents: Vec<SkillHistoryDocument> = self
            .collection
            .find(doc! { "skill": skill_id.to_string() })
            .sort(history_sort())
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(SkillHistory::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_sort_newest_first_with_id_tiebreak() {
        let sort = history_sort();
        let keys: Vec<&str> = sort.keys().map(String::as_str).collect();

        assert_eq!(keys, ["createdAt", "_id"]);
        assert_eq!(sort.get_i32("createdAt").unwrap(), -1);
        assert_eq!(sort.get_i32("_id").unwrap(), -1);
    }
}
