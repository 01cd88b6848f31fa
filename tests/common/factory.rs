use uuid::Uuid;

use skilltrack::models::{CreateUser, Skill, SkillInput};
use skilltrack::services::{AuthService, SkillService};
use skilltrack::state::AppState;

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test user and return auth info
    pub async fn create_user(&self) -> TestAuth {
        let email = format!("test-{}@example.com", Uuid::new_v4());
        self.create_user_with_email(&email, "TestPassword123!").await
    }

    /// Create a test user with specific credentials
    pub async fn create_user_with_email(&self, email: &str, password: &str) -> TestAuth {
        let input = CreateUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let user = AuthService::register(self.state.users.as_ref(), input)
            .await
            .unwrap();
        let token = AuthService::generate_token(user.id, &user.email, &self.state.config).unwrap();

        TestAuth {
            user_id: user.id,
            email: user.email,
            token,
        }
    }

    /// Create a skill owned by `user_id`
    pub async fn create_skill(
        &self,
        user_id: Uuid,
        name: &str,
        category: &str,
        proficiency_level: i64,
    ) -> Skill {
        let input = SkillInput {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            proficiency_level: Some(proficiency_level),
            ..Default::default()
        };

        SkillService::from_state(self.state)
            .create(user_id, input)
            .await
            .unwrap()
    }
}
