use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    timestamp_now, Skill, SkillDraft, SkillHistory, SkillInput, SkillQuery, SkillStats,
};
use crate::repositories::{SkillHistoryRepository, SkillRepository};
use crate::state::AppState;

/// Skill operations, every one scoped to the calling user.
///
/// Ownership is checked after the lookup, so a skill that exists but belongs
/// to someone else yields `Forbidden` while a missing one yields `NotFound`.
#[derive(Clone)]
pub struct SkillService {
    skills: Arc<dyn SkillRepository>,
    history: Arc<dyn SkillHistoryRepository>,
}

impl SkillService {
    pub fn new(skills: Arc<dyn SkillRepository>, history: Arc<dyn SkillHistoryRepository>) -> Self {
        Self { skills, history }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.skills.clone(), state.history.clone())
    }

    pub async fn list(&self, user_id: Uuid, query: &SkillQuery) -> AppResult<Vec<Skill>> {
        self.skills.list_by_user(user_id, query).await
    }

    pub async fn get(&self, user_id: Uuid, id: &str) -> AppResult<Skill> {
        self.load_owned(user_id, id, "access").await
    }

    pub async fn create(&self, user_id: Uuid, input: SkillInput) -> AppResult<Skill> {
        let fields = SkillDraft::from_input(input).finish()?;
        let skill = Skill::new(user_id, fields, timestamp_now());

        self.skills.insert(&skill).await?;
        tracing::info!(user_id = %user_id, skill_id = %skill.id, "Skill created");

        self.record(SkillHistory::created(&skill)).await;
        Ok(skill)
    }

    pub async fn update(&self, user_id: Uuid, id: &str, input: SkillInput) -> AppResult<Skill> {
        let before = self.load_owned(user_id, id, "update").await?;

        let fields = SkillDraft::from_skill(&before).merge(input).finish()?;
        let mut after = before.clone();
        after.apply(fields, timestamp_now());

        self.skills.replace(&after).await?;
        tracing::info!(user_id = %user_id, skill_id = %after.id, "Skill updated");

        self.record(SkillHistory::updated(&before, &after)).await;
        Ok(after)
    }

    pub async fn delete(&self, user_id: Uuid, id: &str) -> AppResult<()> {
        let skill = self.load_owned(user_id, id, "delete").await?;

        self.skills.delete(skill.id).await?;
        tracing::info!(user_id = %user_id, skill_id = %skill.id, "Skill deleted");

        self.record(SkillHistory::deleted(&skill, timestamp_now()))
            .await;
        Ok(())
    }

    pub async fn stats(&self, user_id: Uuid) -> AppResult<SkillStats> {
        let skills = self
            .skills
            .list_by_user(user_id, &SkillQuery::default())
            .await?;
        Ok(SkillStats::from_skills(&skills))
    }

    /// Audit trail of one skill, newest first
    pub async fn history(&self, user_id: Uuid, id: &str) -> AppResult<Vec<SkillHistory>> {
        let skill = self.load_owned(user_id, id, "access").await?;
        self.history.list_by_skill(skill.id).await
    }

    async fn load_owned(&self, user_id: Uuid, id: &str, action: &str) -> AppResult<Skill> {
        // Malformed ids cannot name an existing skill
        let id = Uuid::parse_str(id).map_err(|_| AppError::NotFound("Skill".to_string()))?;
        let skill = self.skills.find_by_id(id).await?;

        if skill.user != user_id {
            tracing::warn!(user_id = %user_id, skill_id = %id, "Skill ownership check failed");
            return Err(AppError::Forbidden(format!("{} this skill", action)));
        }

        Ok(skill)
    }

    /// History is written after the skill itself; a failure here is logged
    /// and does not undo or fail the mutation.
    async fn record(&self, entry: SkillHistory) {
        if let Err(e) = self.history.record(&entry).await {
            tracing::warn!(
                skill_id = %entry.skill,
                action = ?entry.action,
                error = %e,
                "Failed to record skill history"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoryAction, SkillCategory};
    use crate::repositories::InMemoryStore;

    fn service() -> SkillService {
        let store = Arc::new(InMemoryStore::new());
        SkillService::new(store.clone(), store)
    }

    fn react() -> SkillInput {
        SkillInput {
            name: Some("React".to_string()),
            category: Some("frontend".to_string()),
            proficiency_level: Some(3),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner_and_defaults() {
        let service = service();
        let owner = Uuid::new_v4();

        let skill = service.create(owner, react()).await.unwrap();

        assert_eq!(skill.user, owner);
        assert_eq!(skill.progress_percentage, 0);
        assert_eq!(skill.category, SkillCategory::Frontend);
        assert_eq!(skill.started_at, skill.last_updated);
    }

    #[tokio::test]
    async fn test_other_user_is_forbidden() {
        let service = service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let skill = service.create(owner, react()).await.unwrap();
        let id = skill.id.to_string();

        assert!(matches!(
            service.get(intruder, &id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.update(intruder, &id, react()).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(intruder, &id).await,
            Err(AppError::Forbidden(_))
        ));

        // Still intact for the owner
        assert_eq!(service.get(owner, &id).await.unwrap(), skill);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids_not_found() {
        let service = service();
        let user = Uuid::new_v4();

        assert!(matches!(
            service.get(user, &Uuid::new_v4().to_string()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get(user, "not-an-id").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_refreshes_last_updated_only() {
        let service = service();
        let owner = Uuid::new_v4();
        let skill = service.create(owner, react()).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let updated = service
            .update(
                owner,
                &skill.id.to_string(),
                SkillInput {
                    progress_percentage: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.progress_percentage, 40);
        assert_eq!(updated.started_at, skill.started_at);
        assert_eq!(updated.user, owner);
        assert!(updated.last_updated > skill.last_updated);
    }

    #[tokio::test]
    async fn test_history_follows_mutations() {
        let service = service();
        let owner = Uuid::new_v4();
        let skill = service.create(owner, react()).await.unwrap();
        let id = skill.id.to_string();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        service
            .update(
                owner,
                &id,
                SkillInput {
                    proficiency_level: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let history = service.history(owner, &id).await.unwrap();
        let actions: Vec<HistoryAction> = history.iter().map(|h| h.action).collect();
        assert_eq!(
            actions,
            [HistoryAction::ProficiencyIncreased, HistoryAction::Created]
        );
        assert_eq!(
            history[0].changes.before.as_ref().unwrap().proficiency_level,
            3
        );
        assert_eq!(history[0].changes.after.as_ref().unwrap().proficiency_level, 4);
    }

    #[tokio::test]
    async fn test_stats_match_list() {
        let service = service();
        let owner = Uuid::new_v4();
        service.create(owner, react()).await.unwrap();
        service
            .create(
                owner,
                SkillInput {
                    name: Some("Go".to_string()),
                    category: Some("backend".to_string()),
                    proficiency_level: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // Someone else's skill never counts
        service.create(Uuid::new_v4(), react()).await.unwrap();

        let stats = service.stats(owner).await.unwrap();
        let listed = service.list(owner, &SkillQuery::default()).await.unwrap();

        assert_eq!(stats.total_skills, listed.len() as u64);
        assert_eq!(stats.average_proficiency, 3.5);
        assert_eq!(stats.category_breakdown["frontend"], 1);
        assert_eq!(stats.category_breakdown["backend"], 1);
    }
}
