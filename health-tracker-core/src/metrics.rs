use std::{
    fmt::Display,
    num::{IntErrorKind, ParseIntError},
    ops::RangeInclusive,
    str::FromStr,
    sync::Arc,
};

use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use thiserror::Error;

use crate::{Database, DatabaseError, NewHealthRecord};

lazy_static! {
    static ref BLOOD_PRESSURE: Regex = Regex::new(r"^\s*([+-]?\d+)\s*/\s*([+-]?\d+)\s*$").unwrap();
}

#[derive(Debug, Error)]
pub enum MetricsError {
    /// Weight or steps could not be read as a number of the right kind
    #[error("Please enter a valid number for {field}, got \"{value}\"")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Blood pressure must be in the format '120/80'")]
    MalformedBloodPressure(String),
    #[error("Blood pressure {0} is out of the normal range")]
    OutOfRangeBloodPressure(BloodPressure),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Storage failure: {0}")]
    StorageFailure(DatabaseError),
}

/// A systolic/diastolic pair in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

impl BloodPressure {
    pub const SYSTOLIC_RANGE: RangeInclusive<i32> = 60..=200;
    pub const DIASTOLIC_RANGE: RangeInclusive<i32> = 40..=130;

    pub fn is_in_range(&self) -> bool {
        Self::SYSTOLIC_RANGE.contains(&self.systolic)
            && Self::DIASTOLIC_RANGE.contains(&self.diastolic)
    }
}

impl Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Reads one side of a pressure. Integers too large for an i32 saturate,
/// so they fail the range check instead of the format check.
fn parse_pressure(raw: &str) -> Result<i32, ParseIntError> {
    match raw.parse::<i32>() {
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i32::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(i32::MIN),
        result => result,
    }
}

/// Parses the format only, see [BloodPressure::is_in_range] for the range check.
impl FromStr for BloodPressure {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MetricsError::MalformedBloodPressure(s.to_string());

        let captures = BLOOD_PRESSURE.captures(s).ok_or_else(malformed)?;
        let systolic = parse_pressure(&captures[1]).map_err(|_| malformed())?;
        let diastolic = parse_pressure(&captures[2]).map_err(|_| malformed())?;

        Ok(Self {
            systolic,
            diastolic,
        })
    }
}

/// A validated set of metrics, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// In kilograms, always positive
    pub weight: f64,
    pub blood_pressure: BloodPressure,
    /// At most [Reading::MAX_STEPS]
    pub steps: u64,
}

impl Reading {
    /// The largest step count the database column holds
    pub const MAX_STEPS: u64 = i64::MAX as u64;

    /// Validates raw console input. Checks run in order: weight, steps, blood pressure format,
    /// blood pressure range.
    pub fn parse(weight_raw: &str, bp_raw: &str, steps_raw: &str) -> Result<Self, MetricsError> {
        let weight = weight_raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w > 0.)
            .ok_or_else(|| MetricsError::InvalidNumber {
                field: "weight",
                value: weight_raw.to_string(),
            })?;

        let steps = steps_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s <= Self::MAX_STEPS)
            .ok_or_else(|| MetricsError::InvalidNumber {
                field: "steps",
                value: steps_raw.to_string(),
            })?;

        let blood_pressure: BloodPressure = bp_raw.parse()?;

        if !blood_pressure.is_in_range() {
            return Err(MetricsError::OutOfRangeBloodPressure(blood_pressure));
        }

        Ok(Self {
            weight,
            blood_pressure,
            steps,
        })
    }
}

/// Validates and stores health readings
pub struct MetricsRecorder<Db> {
    db: Arc<Db>,
}

impl<Db> MetricsRecorder<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Validates the raw input and stores it as a new record for the user.
    /// Nothing is written unless every check passes.
    pub async fn record(
        &self,
        username: &str,
        weight_raw: &str,
        bp_raw: &str,
        steps_raw: &str,
    ) -> Result<(), MetricsError> {
        let reading = Reading::parse(weight_raw, bp_raw, steps_raw)?;

        let user = self.db.user_by_username(username).await.map_err(|e| {
            if e.is_not_found() {
                MetricsError::UserNotFound(username.to_string())
            } else {
                MetricsError::StorageFailure(e)
            }
        })?;

        let record = self
            .db
            .create_health_record(NewHealthRecord {
                user_id: user.id,
                weight: reading.weight,
                blood_pressure: reading.blood_pressure,
                steps: reading.steps,
            })
            .await
            .map_err(MetricsError::StorageFailure)?;

        info!("Recorded health data #{} for {}", record.id, username);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::{Database, MemoryDatabase, NewUser};

    use super::*;

    async fn database_with_alice() -> Arc<MemoryDatabase> {
        let db = Arc::new(MemoryDatabase::default());

        db.create_user(NewUser {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();

        db
    }

    #[test]
    fn parses_valid_reading() {
        let reading = Reading::parse("70.5", "120/80", "8000").unwrap();

        assert_eq!(reading.weight, 70.5);
        assert_eq!(
            reading.blood_pressure,
            BloodPressure {
                systolic: 120,
                diastolic: 80
            }
        );
        assert_eq!(reading.steps, 8000);

        let padded = Reading::parse(" 65 ", " 118 / 76 ", " 0 ").unwrap();
        assert_eq!(padded.blood_pressure.to_string(), "118/76");
        assert_eq!(padded.steps, 0);
    }

    #[test]
    fn rejects_invalid_numbers() {
        for (weight, steps) in [
            ("heavy", "100"),
            ("0", "100"),
            ("-70", "100"),
            ("NaN", "100"),
            ("70", "lots"),
            ("70", "-5"),
            ("70", "12.5"),
        ] {
            assert!(
                matches!(
                    Reading::parse(weight, "120/80", steps),
                    Err(MetricsError::InvalidNumber { .. })
                ),
                "{weight} kg / {steps} steps should be rejected"
            );
        }
    }

    #[test]
    fn number_errors_come_before_blood_pressure_errors() {
        let error = Reading::parse("abc", "not a pressure", "100").unwrap_err();

        assert!(matches!(
            error,
            MetricsError::InvalidNumber {
                field: "weight",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_blood_pressure() {
        for bp in ["", "120", "120/", "/80", "120/80/60", "120-80", "abc/80", "120/8o", "12.5/80"] {
            assert!(
                matches!(
                    Reading::parse("70", bp, "100"),
                    Err(MetricsError::MalformedBloodPressure(_))
                ),
                "{bp:?} should be malformed"
            );
        }
    }

    #[test]
    fn blood_pressure_boundaries() {
        let accepted = ["60/80", "200/80", "120/40", "120/130"];
        let rejected = ["59/80", "201/80", "120/39", "120/131"];

        for bp in accepted {
            assert!(Reading::parse("70", bp, "100").is_ok(), "{bp} should be accepted");
        }

        for bp in rejected {
            assert!(
                matches!(
                    Reading::parse("70", bp, "100"),
                    Err(MetricsError::OutOfRangeBloodPressure(_))
                ),
                "{bp} should be out of range"
            );
        }
    }

    #[test]
    fn huge_pressures_are_out_of_range() {
        for bp in ["99999999999/80", "120/99999999999", "-99999999999/80"] {
            assert!(
                matches!(
                    Reading::parse("70", bp, "100"),
                    Err(MetricsError::OutOfRangeBloodPressure(_))
                ),
                "{bp} should be out of range"
            );
        }
    }

    #[test]
    fn step_counts_fill_the_column() {
        let reading = Reading::parse("70", "120/80", "5000000000").unwrap();
        assert_eq!(reading.steps, 5_000_000_000);

        let max = Reading::MAX_STEPS.to_string();
        assert_eq!(Reading::parse("70", "120/80", &max).unwrap().steps, Reading::MAX_STEPS);

        let too_many = (Reading::MAX_STEPS + 1).to_string();
        assert!(matches!(
            Reading::parse("70", "120/80", &too_many),
            Err(MetricsError::InvalidNumber { field: "steps", .. })
        ));
    }

    #[tokio::test]
    async fn records_for_known_user() {
        let db = database_with_alice().await;
        let recorder = MetricsRecorder::new(&db);

        recorder
            .record("alice", "70.5", "120/80", "8000")
            .await
            .unwrap();

        assert_eq!(db.record_count(), 1);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let db = database_with_alice().await;
        let recorder = MetricsRecorder::new(&db);

        let result = recorder.record("bob", "70.5", "120/80", "8000").await;

        assert!(matches!(result, Err(MetricsError::UserNotFound(u)) if u == "bob"));
        assert_eq!(db.record_count(), 0);
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let db = database_with_alice().await;
        let recorder = MetricsRecorder::new(&db);

        assert!(recorder.record("alice", "70", "250/80", "100").await.is_err());
        assert!(recorder.record("alice", "70", "120/80", "x").await.is_err());
        assert_eq!(db.record_count(), 0);
    }

    #[tokio::test]
    async fn storage_failures_are_reported() {
        let db = database_with_alice().await;
        let recorder = MetricsRecorder::new(&db);

        db.go_offline();

        let result = recorder.record("alice", "70", "120/80", "100").await;
        assert!(matches!(result, Err(MetricsError::StorageFailure(_))));
    }
}
