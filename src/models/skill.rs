use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

const MAX_NAME_LENGTH: u64 = 100;
const MAX_DESCRIPTION_LENGTH: u64 = 500;
const MAX_LEARNING_GOAL_LENGTH: u64 = 300;

static RESOURCE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://.+").unwrap());

// ============ Enumerations ============

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    Devops,
    Testing,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Database,
        SkillCategory::Devops,
        SkillCategory::Testing,
        SkillCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Database => "database",
            SkillCategory::Devops => "devops",
            SkillCategory::Testing => "testing",
            SkillCategory::Other => "other",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| AppError::invalid("category", format!("'{}' is not a valid category", s)))
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Documentation,
    Tutorial,
    Video,
    Article,
    Course,
    #[default]
    Other,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        ResourceType::Documentation,
        ResourceType::Tutorial,
        ResourceType::Video,
        ResourceType::Article,
        ResourceType::Course,
        ResourceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Documentation => "documentation",
            ResourceType::Tutorial => "tutorial",
            ResourceType::Video => "video",
            ResourceType::Article => "article",
            ResourceType::Course => "course",
            ResourceType::Other => "other",
        }
    }
}

impl FromStr for ResourceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| AppError::invalid("type", format!("'{}' is not a valid resource type", s)))
    }
}

// ============ Domain model ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    /// Owning user, fixed at creation
    pub user: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: SkillCategory,
    pub proficiency_level: i32,
    pub progress_percentage: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_goal: Option<String>,
    pub resources: Vec<Resource>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub last_updated: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
}

/// Validated, typed skill fields ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct SkillFields {
    pub name: String,
    pub description: Option<String>,
    pub category: SkillCategory,
    pub proficiency_level: i32,
    pub progress_percentage: i32,
    pub learning_goal: Option<String>,
    pub resources: Vec<Resource>,
}

impl Skill {
    pub fn new(user: Uuid, fields: SkillFields, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            name: fields.name,
            description: fields.description,
            category: fields.category,
            proficiency_level: fields.proficiency_level,
            progress_percentage: fields.progress_percentage,
            learning_goal: fields.learning_goal,
            resources: fields.resources,
            started_at: now,
            last_updated: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields; id, owner and start date never change
    pub fn apply(&mut self, fields: SkillFields, now: OffsetDateTime) {
        self.name = fields.name;
        self.description = fields.description;
        self.category = fields.category;
        self.proficiency_level = fields.proficiency_level;
        self.progress_percentage = fields.progress_percentage;
        self.learning_goal = fields.learning_goal;
        self.resources = fields.resources;
        self.last_updated = now;
        self.updated_at = now;
    }
}

// ============ Request payload ============

/// Body of POST and PUT /api/skills. Every field is optional at the wire
/// level so missing required fields surface as field-level validation
/// messages. Owner and dates are never read from the client.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub proficiency_level: Option<i64>,
    pub progress_percentage: Option<i64>,
    pub learning_goal: Option<String>,
    pub resources: Option<Vec<ResourceInput>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInput {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ============ Validation ============

/// Untyped skill document, normalised but not yet validated
#[derive(Debug, Clone, Validate)]
pub struct SkillDraft {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(length(
        max = MAX_DESCRIPTION_LENGTH,
        message = "Description cannot exceed 500 characters"
    ))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_category"))]
    pub category: String,

    #[validate(range(min = 1, max = 5, message = "Proficiency level must be between 1 and 5"))]
    pub proficiency_level: i64,

    #[validate(range(
        min = 0,
        max = 100,
        message = "Progress percentage must be between 0 and 100"
    ))]
    pub progress_percentage: i64,

    #[validate(length(
        max = MAX_LEARNING_GOAL_LENGTH,
        message = "Learning goal cannot exceed 300 characters"
    ))]
    pub learning_goal: Option<String>,

    #[validate(nested)]
    pub resources: Vec<ResourceDraft>,
}

#[derive(Debug, Clone, Validate)]
pub struct ResourceDraft {
    pub id: Uuid,

    #[validate(length(min = 1, message = "Resource title is required"))]
    pub title: String,

    #[validate(custom(function = "validate_resource_url"))]
    pub url: String,

    #[validate(custom(function = "validate_resource_type"))]
    pub kind: String,
}

impl SkillDraft {
    /// Draft for a new skill, with schema defaults applied
    pub fn from_input(input: SkillInput) -> Self {
        Self {
            name: trimmed(input.name).unwrap_or_default(),
            description: trimmed(input.description),
            category: input
                .category
                .map(|c| c.trim().to_lowercase())
                .unwrap_or_default(),
            proficiency_level: input.proficiency_level.unwrap_or(1),
            progress_percentage: input.progress_percentage.unwrap_or(0),
            learning_goal: trimmed(input.learning_goal),
            resources: input
                .resources
                .unwrap_or_default()
                .into_iter()
                .map(ResourceDraft::from_input)
                .collect(),
        }
    }

    /// Draft holding the current state of a stored skill
    pub fn from_skill(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            description: skill.description.clone(),
            category: skill.category.as_str().to_string(),
            proficiency_level: skill.proficiency_level.into(),
            progress_percentage: skill.progress_percentage.into(),
            learning_goal: skill.learning_goal.clone(),
            resources: skill
                .resources
                .iter()
                .map(|r| ResourceDraft {
                    id: r.id,
                    title: r.title.clone(),
                    url: r.url.clone(),
                    kind: r.kind.as_str().to_string(),
                })
                .collect(),
        }
    }

    /// Merge the fields present in `input`. An empty optional text clears it.
    pub fn merge(mut self, input: SkillInput) -> Self {
        if let Some(name) = input.name {
            self.name = name.trim().to_string();
        }
        if input.description.is_some() {
            self.description = trimmed(input.description);
        }
        if let Some(category) = input.category {
            self.category = category.trim().to_lowercase();
        }
        if let Some(level) = input.proficiency_level {
            self.proficiency_level = level;
        }
        if let Some(progress) = input.progress_percentage {
            self.progress_percentage = progress;
        }
        if input.learning_goal.is_some() {
            self.learning_goal = trimmed(input.learning_goal);
        }
        if let Some(resources) = input.resources {
            self.resources = resources.into_iter().map(ResourceDraft::from_input).collect();
        }
        self
    }

    /// Run every schema constraint and convert to typed fields
    pub fn finish(self) -> AppResult<SkillFields> {
        self.validate()?;

        let resources = self
            .resources
            .into_iter()
            .map(|r| {
                Ok(Resource {
                    id: r.id,
                    title: r.title,
                    url: r.url,
                    kind: r.kind.parse()?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(SkillFields {
            name: self.name,
            description: self.description,
            category: self.category.parse()?,
            proficiency_level: narrow(self.proficiency_level, "proficiencyLevel")?,
            progress_percentage: narrow(self.progress_percentage, "progressPercentage")?,
            learning_goal: self.learning_goal,
            resources,
        })
    }
}

impl ResourceDraft {
    fn from_input(input: ResourceInput) -> Self {
        Self {
            id: input.id.unwrap_or_else(Uuid::new_v4),
            title: trimmed(input.title).unwrap_or_default(),
            url: input.url.map(|u| u.trim().to_string()).unwrap_or_default(),
            kind: input
                .kind
                .map(|k| k.trim().to_lowercase())
                .unwrap_or_else(|| ResourceType::Other.as_str().to_string()),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn narrow(value: i64, field: &str) -> AppResult<i32> {
    i32::try_from(value).map_err(|_| AppError::invalid(field, "Value is out of range"))
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_name(name: &String) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(failure("required", "Please provide a skill name"));
    }
    if name.chars().count() as u64 > MAX_NAME_LENGTH {
        return Err(failure(
            "length",
            "Skill name cannot exceed 100 characters",
        ));
    }
    Ok(())
}

fn validate_category(category: &String) -> Result<(), ValidationError> {
    if category.is_empty() {
        return Err(failure("required", "Please provide a category"));
    }
    if category.parse::<SkillCategory>().is_err() {
        return Err(failure(
            "enum",
            "Category must be one of: frontend, backend, database, devops, testing, other",
        ));
    }
    Ok(())
}

fn validate_resource_url(url: &String) -> Result<(), ValidationError> {
    if RESOURCE_URL.is_match(url) {
        Ok(())
    } else {
        Err(failure("url", "Please provide a valid URL"))
    }
}

fn validate_resource_type(kind: &String) -> Result<(), ValidationError> {
    if kind.parse::<ResourceType>().is_ok() {
        Ok(())
    } else {
        Err(failure(
            "enum",
            "Resource type must be one of: documentation, tutorial, video, article, course, other",
        ))
    }
}
