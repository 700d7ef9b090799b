use argon2::{
    password_hash::{Encoding, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use log::{info, warn};
use rand::rngs::OsRng;
use std::sync::Arc;
use thiserror::Error;

use crate::{Database, DatabaseError, PrimaryKey};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username {0} not found")]
    UserNotFound(String),
    /// Password does not match the stored hash
    #[error("Incorrect password")]
    InvalidCredential,
    /// Something else went wrong with the database
    #[error("Storage failure: {0}")]
    StorageFailure(DatabaseError),
    #[error("HashError: {0}")]
    HashError(String),
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Proof of a successful login, passed along to everything that acts on behalf of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: PrimaryKey,
    username: String,
}

impl Session {
    pub fn user_id(&self) -> PrimaryKey {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Checks login attempts against stored password hashes
pub struct Authenticator<Db> {
    db: Arc<Db>,
    argon: Argon2<'static>,
}

impl<Db> Authenticator<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self {
            db: db.clone(),
            argon: Argon2::default(),
        }
    }

    /// Verifies the credentials, returning a session bound to the user
    pub async fn authenticate(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let user = self
            .db
            .user_by_username(&credentials.username)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound {
                    resource: _,
                    identifier: _,
                } => AuthError::UserNotFound(credentials.username.clone()),
                err => AuthError::StorageFailure(err),
            })?;

        let stored_password = PasswordHash::parse(&user.password_hash, Encoding::default())
            .map_err(|e| AuthError::HashError(e.to_string()))?;

        if self
            .argon
            .verify_password(credentials.password.as_bytes(), &stored_password)
            .is_err()
        {
            warn!("Failed login for {}", user.username);
            return Err(AuthError::InvalidCredential);
        }

        info!("{} logged in", user.username);

        Ok(Session {
            user_id: user.id,
            username: user.username,
        })
    }
}

/// Hashes a password with a fresh random salt, returning the PHC string
pub(crate) fn hash_password(argon: &Argon2, password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);

    argon
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| e.to_string())
}

/// What happens after a failed login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Retry { remaining: usize },
    /// No further attempts are allowed in this run
    LockedOut,
}

/// Counts consecutive failed logins within one run of the program.
#[derive(Debug, Default)]
pub struct LoginAttempts {
    failures: usize,
}

impl LoginAttempts {
    pub const MAX: usize = 3;

    pub fn record_failure(&mut self) -> AttemptOutcome {
        self.failures = (self.failures + 1).min(Self::MAX);

        if self.is_locked_out() {
            AttemptOutcome::LockedOut
        } else {
            AttemptOutcome::Retry {
                remaining: Self::MAX - self.failures,
            }
        }
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    pub fn is_locked_out(&self) -> bool {
        self.failures >= Self::MAX
    }
}
