use serde::{Deserialize, Serialize};

/// A fresh load sample taken from the database (cache hits emit nothing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSampled {
    pub database_identity: String,
    pub load_pct: f64,
    pub active_sessions: i64,
    pub sampled_at: chrono::DateTime<chrono::Utc>,
}

impl LoadSampled {
    pub fn new(database_identity: impl Into<String>, load_pct: f64, active_sessions: i64) -> Self {
        Self {
            database_identity: database_identity.into(),
            load_pct,
            active_sessions,
            sampled_at: chrono::Utc::now(),
        }
    }
}
