use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::entity::{skill::COLLECTION, SkillDocument};
use crate::error::{AppError, AppResult};
use crate::models::{Skill, SkillQuery};
use crate::repositories::SkillRepository;

/// Skill repository for MongoDB
#[derive(Clone)]
pub struct MongoSkillRepository {
    collection: Collection<SkillDocument>,
}

impl MongoSkillRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }
}

/// Translate a query's ordering into a Mongo sort document, ending with the
/// `_id` tie-breaker so results are stable.
fn sort_document(query: &SkillQuery) -> Document {
    let mut sort = Document::new();
    for key in &query.sort {
        sort.insert(key.field.as_str(), if key.descending { -1 } else { 1 });
    }
    sort.insert("_id", 1);
    sort
}

fn filter_document(user_id: Uuid, query: &SkillQuery) -> Document {
    let mut filter = doc! { "user": user_id.to_string() };
    if let Some(category) = &query.category {
        filter.insert("category", category.as_str());
    }
    filter
}

#[async_trait]
impl SkillRepository for MongoSkillRepository {
    async fn insert(&self, skill: &Skill) -> AppResult<()> {
        self.collection.insert_one(SkillDocument::from(skill)).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Skill> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?
            .ok_or_else(|| AppError::NotFound("Skill".to_string()))?;

        document.try_into()
    }

    async fn list_by_user(&self, user_id: Uuid, query: &SkillQuery) -> AppResult<Vec<Skill>> {
        let documents: Vec<SkillDocument> = self
            .collection
            .find(filter_document(user_id, query))
            .sort(sort_document(query))
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(Skill::try_from).collect()
    }

    async fn replace(&self, skill: &Skill) -> AppResult<()> {
        let result = self
            .collection
            .replace_one(
                doc! { "_id": skill.id.to_string() },
                SkillDocument::from(skill),
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Skill".to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Skill".to_string()));
        }

        Ok(())
    }
}
