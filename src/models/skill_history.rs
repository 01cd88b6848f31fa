use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Skill;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    ProficiencyIncreased,
    ProgressUpdated,
    Deleted,
}

impl HistoryAction {
    /// Pick the most specific action describing an update
    pub fn classify(before: &SkillSnapshot, after: &SkillSnapshot) -> Self {
        if after.proficiency_level > before.proficiency_level {
            HistoryAction::ProficiencyIncreased
        } else if after.progress_percentage != before.progress_percentage {
            HistoryAction::ProgressUpdated
        } else {
            HistoryAction::Updated
        }
    }
}

/// The tracked subset of a skill's mutable fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillSnapshot {
    pub proficiency_level: i32,
    pub progress_percentage: i32,
    pub description: Option<String>,
    pub learning_goal: Option<String>,
}

impl From<&Skill> for SkillSnapshot {
    fn from(skill: &Skill) -> Self {
        Self {
            proficiency_level: skill.proficiency_level,
            progress_percentage: skill.progress_percentage,
            description: skill.description.clone(),
            learning_goal: skill.learning_goal.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct HistoryChanges {
    pub before: Option<SkillSnapshot>,
    pub after: Option<SkillSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillHistory {
    pub id: Uuid,
    pub skill: Uuid,
    pub user: Uuid,
    pub action: HistoryAction,
    pub changes: HistoryChanges,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
}

impl SkillHistory {
    fn entry(
        skill: &Skill,
        action: HistoryAction,
        changes: HistoryChanges,
        message: String,
        at: OffsetDateTime,
    ) -> Self {
        // v7 ids grow monotonically, breaking same-millisecond ties in write order
        Self {
            id: Uuid::now_v7(),
            skill: skill.id,
            user: skill.user,
            action,
            changes,
            message,
            created_at: at,
        }
    }

    pub fn created(skill: &Skill) -> Self {
        Self::entry(
            skill,
            HistoryAction::Created,
            HistoryChanges {
                before: None,
                after: Some(skill.into()),
            },
            format!("Started tracking {}", skill.name),
            skill.last_updated,
        )
    }

    pub fn updated(before: &Skill, after: &Skill) -> Self {
        let old = SkillSnapshot::from(before);
        let new = SkillSnapshot::from(after);
        let action = HistoryAction::classify(&old, &new);

        let message = match action {
            HistoryAction::ProficiencyIncreased => format!(
                "{} proficiency raised from {} to {}",
                after.name, old.proficiency_level, new.proficiency_level
            ),
            HistoryAction::ProgressUpdated => format!(
                "{} progress moved from {}% to {}%",
                after.name, old.progress_percentage, new.progress_percentage
            ),
            _ => format!("Updated {}", after.name),
        };

        Self::entry(
            after,
            action,
            HistoryChanges {
                before: Some(old),
                after: Some(new),
            },
            message,
            after.last_updated,
        )
    }

    pub fn deleted(skill: &Skill, at: OffsetDateTime) -> Self {
        Self::entry(
            skill,
            HistoryAction::Deleted,
            HistoryChanges {
                before: Some(skill.into()),
                after: None,
            },
            format!("Stopped tracking {}", skill.name),
            at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(level: i32, progress: i32) -> SkillSnapshot {
        SkillSnapshot {
            proficiency_level: level,
            progress_percentage: progress,
            description: None,
            learning_goal: None,
        }
    }

    #[test]
    fn test_classify_proficiency_increase_wins() {
        let action = HistoryAction::classify(&snapshot(2, 10), &snapshot(3, 50));
        assert_eq!(action, HistoryAction::ProficiencyIncreased);
    }

    #[test]
    fn test_classify_progress_change() {
        let action = HistoryAction::classify(&snapshot(3, 10), &snapshot(3, 40));
        assert_eq!(action, HistoryAction::ProgressUpdated);

        // A proficiency decrease is a plain update unless progress moved
        let action = HistoryAction::classify(&snapshot(4, 40), &snapshot(2, 40));
        assert_eq!(action, HistoryAction::Updated);
    }

    #[test]
    fn test_entry_ids_follow_write_order() {
        use crate::models::{timestamp_now, SkillCategory, SkillFields};

        let fields = SkillFields {
            name: "Rust".to_string(),
            description: None,
            category: SkillCategory::Backend,
            proficiency_level: 1,
            progress_percentage: 0,
            learning_goal: None,
            resources: Vec::new(),
        };
        let skill = Skill::new(Uuid::new_v4(), fields, timestamp_now());

        let first = SkillHistory::created(&skill);
        let second = SkillHistory::updated(&skill, &skill);

        assert_eq!(first.created_at, second.created_at);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_action_serializes_snake_case() {
        let json = serde_json::to_string(&HistoryAction::ProficiencyIncreased).unwrap();
        assert_eq!(json, "\"proficiency_increased\"");
    }
}
