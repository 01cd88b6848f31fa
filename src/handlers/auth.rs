use std::borrow::Cow;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::AppResult;
use crate::handlers::common::{AppJson, Envelope};
use crate::middlewares::AuthUser;
use crate::models::{CreateUser, UserResponse};
use crate::services::AuthService;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_user_name"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn validate_user_name(name: &String) -> Result<(), ValidationError> {
    let message = if name.is_empty() {
        "Please provide a name"
    } else if name.chars().count() > 50 {
        "Name cannot exceed 50 characters"
    } else {
        return Ok(());
    };
    Err(ValidationError::new("name").with_message(Cow::Borrowed(message)))
}

/// Token plus the public user fields, side by side
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserResponse,
}

// ============ Handlers ============

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = Envelope<AuthResponse>),
        (status = 409, description = "Email already exists"),
        (status = 400, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Envelope<AuthResponse>>)> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_string();
    payload.validate()?;

    let user = AuthService::register(
        state.users.as_ref(),
        CreateUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        },
    )
    .await?;

    let token = AuthService::generate_token(user.id, &user.email, &state.config)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(AuthResponse {
            token,
            user: user.into(),
        })),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Envelope<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<Envelope<AuthResponse>>> {
    let user =
        AuthService::authenticate(state.users.as_ref(), &payload.email, &payload.password).await?;

    let token = AuthService::generate_token(user.id, &user.email, &state.config)?;

    Ok(Json(Envelope::data(AuthResponse {
        token,
        user: user.into(),
    })))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user info", body = Envelope<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Envelope<UserResponse>>> {
    let user_data = state.users.find_by_id(user.id).await?;
    Ok(Json(Envelope::data(user_data.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_request_rules() {
        assert!(request("Ada", "ada@example.com", "password123").validate().is_ok());
        assert!(request("", "ada@example.com", "password123").validate().is_err());
        assert!(request(&"a".repeat(51), "ada@example.com", "password123")
            .validate()
            .is_err());
        assert!(request("Ada", "not-an-email", "password123").validate().is_err());
        assert!(request("Ada", "ada@example.com", "short").validate().is_err());
    }

    #[test]
    fn test_auth_response_is_flat() {
        let user = UserResponse {
            id: uuid::Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at: crate::models::timestamp_now(),
        };
        let json = serde_json::to_value(AuthResponse {
            token: "t".to_string(),
            user,
        })
        .unwrap();

        assert_eq!(json["token"], "t");
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("user").is_none());
    }
}
