use std::sync::Arc;

use mongodb::Client as MongoClient;

use crate::config::Config;
use crate::repositories::{
    mongo, InMemoryStore, MongoSkillHistoryRepository, MongoSkillRepository, MongoUserRepository,
    SkillHistoryRepository, SkillRepository, UserRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserRepository>,
    pub skills: Arc<dyn SkillRepository>,
    pub history: Arc<dyn SkillHistoryRepository>,
}

impl AppState {
    /// Create a new AppState by connecting to MongoDB
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let mongo_client = MongoClient::with_uri_str(&config.mongodb_url)
            .await
            .map_err(|e| AppStateError::Mongo(e.to_string()))?;

        let db = mongo_client.database(&config.mongodb_database);

        // The driver connects lazily; ping so an unreachable server fails startup
        db.run_command(bson::doc! { "ping": 1 })
            .await
            .map_err(|e| AppStateError::Mongo(e.to_string()))?;

        mongo::ensure_indexes(&db)
            .await
            .map_err(|e| AppStateError::Indexes(e.to_string()))?;

        Ok(Self {
            config,
            users: Arc::new(MongoUserRepository::new(&db)),
            skills: Arc::new(MongoSkillRepository::new(&db)),
            history: Arc::new(MongoSkillHistoryRepository::new(&db)),
        })
    }

    /// Create AppState backed by process memory (for testing)
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());

        Self {
            config,
            users: store.clone(),
            skills: store.clone(),
            history: store,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("MongoDB connection error: {0}")]
    Mongo(String),

    #[error("MongoDB index creation error: {0}")]
    Indexes(String),
}
