pub mod memory;
pub mod mongo;

pub use memory::InMemoryStore;
pub use mongo::{MongoSkillHistoryRepository, MongoSkillRepository, MongoUserRepository};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Skill, SkillHistory, SkillQuery, User};

/// User storage. Emails are unique.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with Conflict if the email is taken
    async fn create(&self, user: &User) -> AppResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<User>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &str) -> AppResult<User>;
}

/// Skill storage. Knows nothing about ownership beyond the stored owner id;
/// callers decide who may see what.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn insert(&self, skill: &Skill) -> AppResult<()>;

    /// Find skill by ID regardless of owner
    async fn find_by_id(&self, id: Uuid) -> AppResult<Skill>;

    /// Skills owned by `user_id`, filtered and ordered by `query`
    async fn list_by_user(&self, user_id: Uuid, query: &SkillQuery) -> AppResult<Vec<Skill>>;

    /// Overwrite a stored skill (last write wins)
    async fn replace(&self, skill: &Skill) -> AppResult<()>;

    /// Permanently remove a skill
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Append-only audit trail of skill mutations
#[async_trait]
pub trait SkillHistoryRepository: Send + Sync {
    async fn record(&self, entry: &SkillHistory) -> AppResult<()>;

    /// Entries for one skill, newest first
    async fn list_by_skill(&self, skill_id: Uuid) -> AppResult<Vec<SkillHistory>>;
}
