use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppResult;
use crate::handlers::common::{AppJson, AppQuery, Empty, Envelope};
use crate::middlewares::AuthUser;
use crate::models::{Skill, SkillHistory, SkillInput, SkillQuery, SkillStats};
use crate::services::SkillService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SkillListParams {
    /// Only skills in this category
    pub category: Option<String>,
    /// Comma separated fields, `-` prefix for descending (e.g. `-proficiencyLevel,name`)
    pub sort: Option<String>,
}

impl SkillListParams {
    /// Collect from raw pairs; a repeated key keeps its first value and
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "category" if params.category.is_none() => params.category = Some(value),
                "sort" if params.sort.is_none() => params.sort = Some(value),
                _ => {}
            }
        }
        params
    }
}

// ============ Handlers ============

/// List the caller's skills
#[utoipa::path(
    get,
    path = "/api/skills",
    params(SkillListParams),
    responses(
        (status = 200, description = "Skills owned by the caller", body = Envelope<Vec<Skill>>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn list_skills(
    user: AuthUser,
    State(state): State<AppState>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> AppResult<Json<Envelope<Vec<Skill>>>> {
    let params = SkillListParams::from_pairs(pairs);
    let query = SkillQuery::from_params(params.category.as_deref(), params.sort.as_deref());
    let skills = SkillService::from_state(&state).list(user.id, &query).await?;
    Ok(Json(Envelope::list(skills)))
}

/// Aggregate statistics over the caller's skills
#[utoipa::path(
    get,
    path = "/api/skills/stats",
    responses(
        (status = 200, description = "Skill statistics", body = Envelope<SkillStats>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn get_skill_stats(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Envelope<SkillStats>>> {
    let stats = SkillService::from_state(&state).stats(user.id).await?;
    Ok(Json(Envelope::data(stats)))
}

/// Get a skill by ID
#[utoipa::path(
    get,
    path = "/api/skills/{id}",
    params(
        ("id" = String, Path, description = "Skill ID")
    ),
    responses(
        (status = 200, description = "Skill found", body = Envelope<Skill>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Skill belongs to another user"),
        (status = 404, description = "Skill not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn get_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<Skill>>> {
    let skill = SkillService::from_state(&state).get(user.id, &id).await?;
    Ok(Json(Envelope::data(skill)))
}

/// Start tracking a new skill
#[utoipa::path(
    post,
    path = "/api/skills",
    request_body = SkillInput,
    responses(
        (status = 201, description = "Skill created successfully", body = Envelope<Skill>),
        (status = 401, description = "Unauthorized"),
        (status = 400, description = "Validation error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn create_skill(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SkillInput>,
) -> AppResult<(StatusCode, Json<Envelope<Skill>>)> {
    let skill = SkillService::from_state(&state)
        .create(user.id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(skill))))
}

/// Update a skill; absent fields keep their stored values
#[utoipa::path(
    put,
    path = "/api/skills/{id}",
    params(
        ("id" = String, Path, description = "Skill ID")
    ),
    request_body = SkillInput,
    responses(
        (status = 200, description = "Skill updated successfully", body = Envelope<Skill>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Skill belongs to another user"),
        (status = 404, description = "Skill not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn update_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SkillInput>,
) -> AppResult<Json<Envelope<Skill>>> {
    let skill = SkillService::from_state(&state)
        .update(user.id, &id, payload)
        .await?;
    Ok(Json(Envelope::data(skill)))
}

/// Stop tracking a skill
#[utoipa::path(
    delete,
    path = "/api/skills/{id}",
    params(
        ("id" = String, Path, description = "Skill ID")
    ),
    responses(
        (status = 200, description = "Skill deleted successfully", body = Envelope<Empty>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Skill belongs to another user"),
        (status = 404, description = "Skill not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn delete_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<Empty>>> {
    SkillService::from_state(&state).delete(user.id, &id).await?;
    Ok(Json(Envelope::data(Empty {})))
}

/// Change log of a skill, newest first
#[utoipa::path(
    get,
    path = "/api/skills/{id}/history",
    params(
        ("id" = String, Path, description = "Skill ID")
    ),
    responses(
        (status = 200, description = "History entries", body = Envelope<Vec<SkillHistory>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Skill belongs to another user"),
        (status = 404, description = "Skill not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Skills"
)]
pub async fn get_skill_history(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<Vec<SkillHistory>>>> {
    let entries = SkillService::from_state(&state)
        .history(user.id, &id)
        .await?;
    Ok(Json(Envelope::list(entries)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_repeated_keys_keep_first_value() {
        let params = SkillListParams::from_pairs(pairs(&[
            ("sort", "name"),
            ("category", "frontend"),
            ("sort", "-name"),
            ("category", "backend"),
        ]));

        assert_eq!(params.sort.as_deref(), Some("name"));
        assert_eq!(params.category.as_deref(), Some("frontend"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let params = SkillListParams::from_pairs(pairs(&[("page", "2"), ("user", "x")]));
        assert!(params.category.is_none());
        assert!(params.sort.is_none());
    }
}
