use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Skill, SkillHistory, SkillQuery, User};
use crate::repositories::{SkillHistoryRepository, SkillRepository, UserRepository};

/// In-memory storage for tests and local demos. Implements every
/// repository trait over one shared map set.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    users: HashMap<Uuid, User>,
    skills: HashMap<Uuid, Skill>,
    history: Vec<SkillHistory>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }
}

#[async_trait]
impl SkillRepository for InMemoryStore {
    async fn insert(&self, skill: &Skill) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.skills.insert(skill.id, skill.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Skill> {
        let inner = self.inner.read().await;
        inner
            .skills
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Skill".to_string()))
    }

    async fn list_by_user(&self, user_id: Uuid, query: &SkillQuery) -> AppResult<Vec<Skill>> {
        let inner = self.inner.read().await;
        let mut skills: Vec<Skill> = inner
            .skills
            .values()
            .filter(|s| s.user == user_id && query.matches(s))
            .cloned()
            .collect();

        skills.sort_by(|a, b| query.compare(a, b));
        Ok(skills)
    }

    async fn replace(&self, skill: &Skill) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .skills
            .get_mut(&skill.id)
            .ok_or_else(|| AppError::NotFound("Skill".to_string()))?;
        *stored = skill.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .skills
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Skill".to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SkillHistoryRepository for InMemoryStore {
    async fn record(&self, entry: &SkillHistory) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.history.push(entry.clone());
        Ok(())
    }

    async fn list_by_skill(&self, skill_id: Uuid) -> AppResult<Vec<SkillHistory>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<SkillHistory> = inner
            .history
            .iter()
            .filter(|h| h.skill == skill_id)
            .cloned()
            .collect();

        // Same order as the Mongo backend: newest first, then id descending
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }
}
