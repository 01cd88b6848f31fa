use serde::{Deserialize, Serialize};

use crate::entity::{from_bson_datetime, parse_id, to_bson_datetime};
use crate::error::{AppError, AppResult};
use crate::models::{Resource, ResourceType, Skill, SkillCategory};

pub const COLLECTION: &str = "skills";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
}

/// Field names match the sort keys accepted by the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: SkillCategory,
    pub proficiency_level: i32,
    pub progress_percentage: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_goal: Option<String>,
    #[serde(default)]
    pub resources: Vec<ResourceDocument>,
    pub started_at: bson::DateTime,
    pub last_updated: bson::DateTime,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl From<&Skill> for SkillDocument {
    fn from(skill: &Skill) -> Self {
        Self {
            id: skill.id.to_string(),
            user: skill.user.to_string(),
            name: skill.name.clone(),
            description: skill.description.clone(),
            category: skill.category,
            proficiency_level: skill.proficiency_level,
            progress_percentage: skill.progress_percentage,
            learning_goal: skill.learning_goal.clone(),
            resources: skill
                .resources
                .iter()
                .map(|r| ResourceDocument {
                    id: r.id.to_string(),
                    title: r.title.clone(),
                    url: r.url.clone(),
                    kind: r.kind,
                })
                .collect(),
            started_at: to_bson_datetime(skill.started_at),
            last_updated: to_bson_datetime(skill.last_updated),
            created_at: to_bson_datetime(skill.created_at),
            updated_at: to_bson_datetime(skill.updated_at),
        }
    }
}

impl TryFrom<SkillDocument> for Skill {
    type Error = AppError;

    fn try_from(doc: SkillDocument) -> AppResult<Self> {
        let resources = doc
            .resources
            .into_iter()
            .map(|r| {
                Ok(Resource {
                    id: parse_id(&r.id, "resource")?,
                    title: r.title,
                    url: r.url,
                    kind: r.kind,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            id: parse_id(&doc.id, "skill")?,
            user: parse_id(&doc.user, "user")?,
            name: doc.name,
            description: doc.description,
            category: doc.category,
            proficiency_level: doc.proficiency_level,
            progress_percentage: doc.progress_percentage,
            learning_goal: doc.learning_goal,
            resources,
            started_at: from_bson_datetime(doc.started_at)?,
            last_updated: from_bson_datetime(doc.last_updated)?,
            created_at: from_bson_datetime(doc.created_at)?,
            updated_at: from_bson_datetime(doc.updated_at)?,
        })
    }
}
