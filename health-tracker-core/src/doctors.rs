use std::{fmt::Display, str::FromStr, sync::Arc};

use thiserror::Error;

use crate::{Database, DatabaseError, DoctorData, PrimaryKey};

/// The fields a doctor can register with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialty {
    Cardiology,
    Dermatology,
    Neurology,
    Orthopedics,
    Pediatrics,
    Psychiatry,
    GeneralMedicine,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown specialty: {0}")]
pub struct UnknownSpecialty(pub String);

impl Specialty {
    /// Every specialty, in menu order
    pub const ALL: [Specialty; 7] = [
        Self::Cardiology,
        Self::Dermatology,
        Self::Neurology,
        Self::Orthopedics,
        Self::Pediatrics,
        Self::Psychiatry,
        Self::GeneralMedicine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cardiology => "Cardiology",
            Self::Dermatology => "Dermatology",
            Self::Neurology => "Neurology",
            Self::Orthopedics => "Orthopedics",
            Self::Pediatrics => "Pediatrics",
            Self::Psychiatry => "Psychiatry",
            Self::GeneralMedicine => "General Medicine",
        }
    }

    /// Returns the specialty at a 1-based menu position
    pub fn from_position(position: usize) -> Option<Self> {
        position
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

impl Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Specialty {
    type Err = UnknownSpecialty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        Self::ALL
            .into_iter()
            .find(|x| x.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSpecialty(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("No doctor with id {0}")]
    DoctorNotFound(PrimaryKey),
    #[error("Storage failure: {0}")]
    StorageFailure(DatabaseError),
}

/// Read access to the doctors that registered with the tracker
pub struct DoctorDirectory<Db> {
    db: Arc<Db>,
}

impl<Db> DoctorDirectory<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    /// Lists every doctor, ordered by id
    pub async fn list(&self) -> Result<Vec<DoctorData>, DirectoryError> {
        let mut doctors = self
            .db
            .list_doctors()
            .await
            .map_err(DirectoryError::StorageFailure)?;

        doctors.sort_by_key(|d| d.id);
        Ok(doctors)
    }

    /// Returns the contact details of a single doctor
    pub async fn contact(&self, doctor_id: PrimaryKey) -> Result<DoctorData, DirectoryError> {
        self.db.doctor_by_id(doctor_id).await.map_err(|e| {
            if e.is_not_found() {
                DirectoryError::DoctorNotFound(doctor_id)
            } else {
                DirectoryError::StorageFailure(e)
            }
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::{Database, MemoryDatabase, NewDoctor};

    use super::*;

    #[test]
    fn specialty_parsing() {
        assert_eq!("cardiology".parse::<Specialty>(), Ok(Specialty::Cardiology));
        assert_eq!(
            " General Medicine ".parse::<Specialty>(),
            Ok(Specialty::GeneralMedicine)
        );
        assert_eq!(
            "Dentistry".parse::<Specialty>(),
            Err(UnknownSpecialty("Dentistry".to_string()))
        );

        for specialty in Specialty::ALL {
            assert_eq!(specialty.to_string().parse::<Specialty>(), Ok(specialty));
        }
    }

    #[test]
    fn specialty_positions() {
        assert_eq!(Specialty::from_position(1), Some(Specialty::Cardiology));
        assert_eq!(Specialty::from_position(7), Some(Specialty::GeneralMedicine));
        assert_eq!(Specialty::from_position(0), None);
        assert_eq!(Specialty::from_position(8), None);
    }

    #[tokio::test]
    async fn contact_lookup() {
        let db = Arc::new(MemoryDatabase::default());
        let directory = DoctorDirectory::new(&db);

        assert!(directory.list().await.unwrap().is_empty());

        let doctor = db
            .create_doctor(NewDoctor {
                name: "Grace Hopper".to_string(),
                specialty: Specialty::Neurology,
                email: "grace@example.com".to_string(),
                phone: "555-0100".to_string(),
                username: "grace".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let found = directory.contact(doctor.id).await.unwrap();
        assert_eq!(found.email, "grace@example.com");
        assert_eq!(found.specialty, Specialty::Neurology);

        assert!(matches!(
            directory.contact(42).await,
            Err(DirectoryError::DoctorNotFound(42))
        ));

        db.go_offline();
        assert!(matches!(
            directory.list().await,
            Err(DirectoryError::StorageFailure(_))
        ));
    }
}
