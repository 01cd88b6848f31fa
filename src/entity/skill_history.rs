use serde::{Deserialize, Serialize};

use crate::entity::{from_bson_datetime, parse_id, to_bson_datetime};
use crate::error::{AppError, AppResult};
use crate::models::{HistoryAction, HistoryChanges, SkillHistory, SkillSnapshot};

pub const COLLECTION: &str = "skill_history";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub proficiency_level: i32,
    pub progress_percentage: i32,
    pub description: Option<String>,
    pub learning_goal: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangesDocument {
    pub before: Option<SnapshotDocument>,
    pub after: Option<SnapshotDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillHistoryDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub skill: String,
    pub user: String,
    pub action: HistoryAction,
    #[serde(default)]
    pub changes: ChangesDocument,
    pub message: String,
    pub created_at: bson::DateTime,
}

impl From<&SkillSnapshot> for SnapshotDocument {
    fn from(s: &SkillSnapshot) -> Self {
        Self {
            proficiency_level: s.proficiency_level,
            progress_percentage: s.progress_percentage,
            description: s.description.clone(),
            learning_goal: s.learning_goal.clone(),
        }
    }
}

impl From<SnapshotDocument> for SkillSnapshot {
    fn from(d: SnapshotDocument) -> Self {
        Self {
            proficiency_level: d.proficiency_level,
            progress_percentage: d.progress_percentage,
            description: d.description,
            learning_goal: d.learning_goal,
        }
    }
}

impl From<&SkillHistory> for SkillHistoryDocument {
    fn from(h: &SkillHistory) -> Self {
        Self {
            id: h.id.to_string(),
            skill: h.skill.to_string(),
            user: h.user.to_string(),
            action: h.action,
            changes: ChangesDocument {
                before: h.changes.before.as_ref().map(SnapshotDocument::from),
                after: h.changes.after.as_ref().map(SnapshotDocument::from),
            },
            message: h.message.clone(),
            created_at: to_bson_datetime(h.created_at),
        }
    }
}

impl TryFrom<SkillHistoryDocument> for SkillHistory {
    type Error = AppError;

    fn try_from(doc: SkillHistoryDocument) -> AppResult<Self> {
        Ok(Self {
            id: parse_id(&doc.id, "history")?,
            skill: parse_id(&doc.skill, "skill")?,
            user: parse_id(&doc.user, "user")?,
            action: doc.action,
            changes: HistoryChanges {
                before: doc.changes.before.map(SkillSnapshot::from),
                after: doc.changes.after.map(SkillSnapshot::from),
            },
            message: doc.message,
            created_at: from_bson_datetime(doc.created_at)?,
        })
    }
}
