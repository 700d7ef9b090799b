use async_trait::async_trait;
use thiserror::Error;

use crate::{BloodPressure, Specialty};

mod data;
pub use data::*;

mod pg;
pub use pg::*;

#[cfg(any(test, feature = "testing"))]
mod memory;
#[cfg(any(test, feature = "testing"))]
pub use memory::*;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An unknown or internal error happened with the database
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync>),
    /// A resource already exists
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        /// The resource in question
        resource: &'static str,
        /// The field that is conflicting
        field: &'static str,
        /// The conflicting value
        value: String,
    },
    /// A resource in the database doesn't exist
    #[error("{resource}:{identifier} doesn't exist")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
}

impl DatabaseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Helper trait to reduce boilerplate
pub trait IntoDatabaseError {
    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError;
    fn conflict_or(self, resource: &'static str, field: &'static str, value: &str) -> DatabaseError;
    fn any(self) -> DatabaseError;
}

/// Helper trait to reduce boilerplate
pub trait DatabaseResult {
    /// Turns the Result into a conflict error if it's Ok()
    fn conflict_or_ok(self, resource: &'static str, field: &'static str, value: &str)
        -> Result<()>;
}

impl<T> DatabaseResult for Result<T> {
    fn conflict_or_ok(
        self,
        resource: &'static str,
        field: &'static str,
        value: &str,
    ) -> Result<()> {
        match self {
            Ok(_) => Err(DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            }),
            Err(e) => match e {
                DatabaseError::NotFound {
                    resource: _,
                    identifier: _,
                } => Ok(()),
                e => Err(e),
            },
        }
    }
}

/// Represents a type that can persist and fetch tracker data.
///
/// Every write is committed before the call returns.
#[async_trait]
pub trait Database: Send + Sync {
    async fn user_by_username(&self, username: &str) -> Result<UserData>;
    async fn create_user(&self, new_user: NewUser) -> Result<UserData>;

    async fn doctor_by_id(&self, doctor_id: PrimaryKey) -> Result<DoctorData>;
    async fn doctor_by_username(&self, username: &str) -> Result<DoctorData>;
    async fn list_doctors(&self) -> Result<Vec<DoctorData>>;
    async fn create_doctor(&self, new_doctor: NewDoctor) -> Result<DoctorData>;

    async fn create_health_record(&self, new_record: NewHealthRecord) -> Result<HealthRecordData>;
    /// Returns the records of a user, newest first
    async fn health_records_by_user(&self, user_id: PrimaryKey) -> Result<Vec<HealthRecordData>>;

    /// Ensures a username is free in both the user and doctor tables
    async fn ensure_username_available(&self, username: &str) -> Result<()> {
        self.user_by_username(username)
            .await
            .conflict_or_ok("user", "username", username)?;

        self.doctor_by_username(username)
            .await
            .conflict_or_ok("doctor", "username", username)
    }
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    /// An already hashed password
    pub password_hash: String,
}

#[derive(Debug)]
pub struct NewDoctor {
    pub name: String,
    pub specialty: Specialty,
    pub email: String,
    pub phone: String,
    pub username: String,
    /// An already hashed password
    pub password_hash: String,
}

#[derive(Debug)]
pub struct NewHealthRecord {
    pub user_id: PrimaryKey,
    pub weight: f64,
    pub blood_pressure: BloodPressure,
    pub steps: u64,
}
