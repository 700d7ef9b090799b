use chrono::{DateTime, Utc};

use crate::{BloodPressure, Specialty};

/// The type used for primary keys in the database.
pub type PrimaryKey = i32;

/// A patient account, able to log in and record health data
#[derive(Debug, Clone)]
pub struct UserData {
    pub id: PrimaryKey,
    pub username: String,
    /// Argon2 hash in PHC string format
    pub password_hash: String,
}

/// A doctor listed in the directory
#[derive(Debug, Clone)]
pub struct DoctorData {
    pub id: PrimaryKey,
    pub name: String,
    pub specialty: Specialty,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub password_hash: String,
}

/// A single day's reading. Never modified once written.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRecordData {
    pub id: PrimaryKey,
    pub user_id: PrimaryKey,
    /// Assigned by the database on insert
    pub date_logged: DateTime<Utc>,
    /// In kilograms
    pub weight: f64,
    pub blood_pressure: BloodPressure,
    pub steps: u64,
}
