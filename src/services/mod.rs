pub mod auth;
pub mod skills;

pub use auth::{AuthService, Claims};
pub use skills::SkillService;
