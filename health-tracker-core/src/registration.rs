use std::sync::Arc;

use argon2::Argon2;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use thiserror::Error;

use crate::{auth::hash_password, Database, DatabaseError, NewDoctor, NewUser, Specialty};

lazy_static! {
    static ref DIGIT: Regex = Regex::new(r"\d").unwrap();
    static ref LETTER: Regex = Regex::new(r"[A-Za-z]").unwrap();
}

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// The first password rule a password breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordWeakness {
    #[error("Password must be at least 8 characters long")]
    TooShort,
    #[error("Password must contain at least one number")]
    MissingDigit,
    #[error("Password must contain at least one letter")]
    MissingLetter,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Username must be at least 3 characters long")]
    UsernameTooShort,
    #[error("Username {0} already exists")]
    DuplicateUsername(String),
    #[error("{0}")]
    WeakPassword(PasswordWeakness),
    #[error("Unknown specialty: {0}")]
    UnknownSpecialty(String),
    #[error("Doctor {0} is required")]
    MissingProfileField(&'static str),
    #[error("Storage failure: {0}")]
    StorageFailure(DatabaseError),
    #[error("HashError: {0}")]
    HashError(String),
}

/// Checks a password against the strength rules, in order
pub fn check_password_strength(password: &str) -> Result<(), PasswordWeakness> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordWeakness::TooShort);
    }

    if !DIGIT.is_match(password) {
        return Err(PasswordWeakness::MissingDigit);
    }

    if !LETTER.is_match(password) {
        return Err(PasswordWeakness::MissingLetter);
    }

    Ok(())
}

/// Profile details a doctor registers with. The specialty is kept raw and checked on registration.
#[derive(Debug, Clone)]
pub struct DoctorProfile {
    pub name: String,
    pub specialty: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub enum Role {
    Patient,
    Doctor(DoctorProfile),
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Registration {
    pub fn patient(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role: Role::Patient,
        }
    }

    pub fn doctor(username: &str, password: &str, profile: DoctorProfile) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role: Role::Doctor(profile),
        }
    }
}

/// Validates new accounts and writes them to the database
pub struct Registrar<Db> {
    db: Arc<Db>,
    argon: Argon2<'static>,
}

impl<Db> Registrar<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self {
            db: db.clone(),
            argon: Argon2::default(),
        }
    }

    /// Registers a patient or doctor. Every check runs before the single insert.
    pub async fn register(&self, registration: Registration) -> Result<(), RegistrationError> {
        let Registration {
            username,
            password,
            role,
        } = registration;

        if username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(RegistrationError::UsernameTooShort);
        }

        self.db
            .ensure_username_available(&username)
            .await
            .map_err(|e| conflict_to_duplicate(e, &username))?;

        check_password_strength(&password).map_err(RegistrationError::WeakPassword)?;

        let doctor = match role {
            Role::Patient => None,
            Role::Doctor(profile) => Some(validate_profile(profile)?),
        };

        let password_hash =
            hash_password(&self.argon, &password).map_err(RegistrationError::HashError)?;

        match doctor {
            None => {
                self.db
                    .create_user(NewUser {
                        username: username.clone(),
                        password_hash,
                    })
                    .await
                    .map_err(|e| conflict_to_duplicate(e, &username))?;

                info!("Registered user {}", username);
            }
            Some((profile, specialty)) => {
                self.db
                    .create_doctor(NewDoctor {
                        name: profile.name,
                        specialty,
                        email: profile.email,
                        phone: profile.phone,
                        username: username.clone(),
                        password_hash,
                    })
                    .await
                    .map_err(|e| conflict_to_duplicate(e, &username))?;

                info!("Registered doctor {} ({})", username, specialty);
            }
        }

        Ok(())
    }
}

fn validate_profile(
    profile: DoctorProfile,
) -> Result<(DoctorProfile, Specialty), RegistrationError> {
    let specialty = profile
        .specialty
        .parse::<Specialty>()
        .map_err(|e| RegistrationError::UnknownSpecialty(e.0))?;

    let required = [
        ("name", &profile.name),
        ("email", &profile.email),
        ("phone", &profile.phone),
    ];

    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(RegistrationError::MissingProfileField(*field));
    }

    Ok((profile, specialty))
}

fn conflict_to_duplicate(error: DatabaseError, username: &str) -> RegistrationError {
    match error {
        DatabaseError::Conflict { .. } => RegistrationError::DuplicateUsername(username.to_string()),
        e => RegistrationError::StorageFailure(e),
    }
}
