pub mod auth;
pub mod common;
pub mod health;
pub mod skills;

pub use auth::{login, me, register, AuthResponse, LoginRequest, RegisterRequest};
pub use common::{AppJson, AppQuery, Empty, Envelope};
pub use health::{health, route_not_found, HealthResponse};
pub use skills::{
    create_skill, delete_skill, get_skill, get_skill_history, get_skill_stats, list_skills,
    update_skill, SkillListParams,
};
