use std::sync::Arc;

use thiserror::Error;

use crate::{Database, DatabaseError, HealthRecordData};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Storage failure: {0}")]
    StorageFailure(DatabaseError),
}

/// Reads back the readings a user has recorded
pub struct HistoryReader<Db> {
    db: Arc<Db>,
}

impl<Db> HistoryReader<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Returns every record of the user, newest first.
    /// An empty list means the user exists but has not recorded anything yet.
    pub async fn history(&self, username: &str) -> Result<Vec<HealthRecordData>, HistoryError> {
        let user = self.db.user_by_username(username).await.map_err(|e| {
            if e.is_not_found() {
                HistoryError::UserNotFound(username.to_string())
            } else {
                HistoryError::StorageFailure(e)
            }
        })?;

        self.db
            .health_records_by_user(user.id)
            .await
            .map_err(HistoryError::StorageFailure)
    }
}
