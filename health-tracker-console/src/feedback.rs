use health_tracker_core::{
    AuthError, DirectoryError, HistoryError, MetricsError, PasswordWeakness, RegistrationError,
};
use log::error;

const STORAGE_TROUBLE: &str = "Could not reach the health database, please try again later.";

/// Turns an error into something the user can act on.
/// Internal details are logged instead of shown.
pub trait Feedback {
    fn feedback(&self) -> String;
}

impl Feedback for AuthError {
    fn feedback(&self) -> String {
        match self {
            Self::UserNotFound(_) => "Username not found, try again!".to_string(),
            Self::InvalidCredential => "Incorrect password, try again!".to_string(),
            Self::StorageFailure(e) => {
                error!("Login failed: {}", e);
                STORAGE_TROUBLE.to_string()
            }
            Self::HashError(e) => {
                error!("Stored password hash is unreadable: {}", e);
                "Your account could not be verified, please contact support.".to_string()
            }
        }
    }
}

impl Feedback for RegistrationError {
    fn feedback(&self) -> String {
        match self {
            Self::WeakPassword(weakness) => match weakness {
                PasswordWeakness::TooShort => "Password must be at least 8 characters long!",
                PasswordWeakness::MissingDigit => "Password must contain at least one number!",
                PasswordWeakness::MissingLetter => "Password must contain at least one letter!",
            }
            .to_string(),
            Self::UsernameTooShort => "Username must be at least 3 characters long!".to_string(),
            Self::DuplicateUsername(_) => "Username already exists!".to_string(),
            Self::UnknownSpecialty(s) => format!("{s} is not a specialty we support."),
            Self::MissingProfileField(field) => format!("Please enter your {field}."),
            Self::StorageFailure(e) => {
                error!("Registration failed: {}", e);
                STORAGE_TROUBLE.to_string()
            }
            Self::HashError(e) => {
                error!("Password hashing failed: {}", e);
                "Your password could not be secured, please try again.".to_string()
            }
        }
    }
}

impl Feedback for MetricsError {
    fn feedback(&self) -> String {
        match self {
            Self::InvalidNumber { field, .. } => format!("Please enter a valid number for {field}!"),
            Self::MalformedBloodPressure(_) => {
                "Blood pressure must be in format '120/80'".to_string()
            }
            Self::OutOfRangeBloodPressure(_) => {
                "Blood pressure values are out of normal range".to_string()
            }
            Self::UserNotFound(_) => "User not found!".to_string(),
            Self::StorageFailure(e) => {
                error!("Saving health data failed: {}", e);
                STORAGE_TROUBLE.to_string()
            }
        }
    }
}

impl Feedback for HistoryError {
    fn feedback(&self) -> String {
        match self {
            Self::UserNotFound(_) => "User not found!".to_string(),
            Self::StorageFailure(e) => {
                error!("Reading health history failed: {}", e);
                STORAGE_TROUBLE.to_string()
            }
        }
    }
}

impl Feedback for DirectoryError {
    fn feedback(&self) -> String {
        match self {
            Self::DoctorNotFound(_) => "Invalid doctor ID. Please try again.".to_string(),
            Self::StorageFailure(e) => {
                error!("Reading the doctor directory failed: {}", e);
                STORAGE_TROUBLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use health_tracker_core::{BloodPressure, DatabaseError};

    use super::*;

    #[test]
    fn password_messages_name_the_rule() {
        let error = RegistrationError::WeakPassword(PasswordWeakness::MissingDigit);
        assert_eq!(error.feedback(), "Password must contain at least one number!");
    }

    #[test]
    fn storage_details_are_hidden() {
        let error = MetricsError::StorageFailure(DatabaseError::Internal(
            "password authentication failed for user root".into(),
        ));

        assert_eq!(error.feedback(), STORAGE_TROUBLE);
    }

    #[test]
    fn metric_messages() {
        let out_of_range = MetricsError::OutOfRangeBloodPressure(BloodPressure {
            systolic: 250,
            diastolic: 80,
        });

        assert!(out_of_range.feedback().contains("out of normal range"));
        assert_eq!(
            MetricsError::InvalidNumber {
                field: "steps",
                value: "lots".to_string()
            }
            .feedback(),
            "Please enter a valid number for steps!"
        );
    }
}
