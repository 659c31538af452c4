//! Database liveness probe backing `/health`.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::application::repos::HealthRepo;
use crate::config::Environment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    Connected,
    Disconnected { reason: String },
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub checked_at: OffsetDateTime,
    pub database: DatabaseStatus,
    pub environment: Environment,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self.database, DatabaseStatus::Connected)
    }
}

#[derive(Clone)]
pub struct HealthService {
    repo: Arc<dyn HealthRepo>,
    environment: Environment,
}

impl HealthService {
    pub fn new(repo: Arc<dyn HealthRepo>, environment: Environment) -> Self {
        Self { repo, environment }
    }

    pub async fn check(&self) -> HealthReport {
        let database = match self.repo.ping().await {
            Ok(()) => DatabaseStatus::Connected,
            Err(err) => DatabaseStatus::Disconnected {
                reason: err.to_string(),
            },
        };

        HealthReport {
            checked_at: OffsetDateTime::now_utc(),
            database,
            environment: self.environment,
        }
    }
}
