use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::{
    Database, DatabaseError, DoctorData, HealthRecordData, NewDoctor, NewHealthRecord, NewUser,
    PrimaryKey, Result, UserData,
};

#[derive(Default)]
struct Tables {
    users: Vec<UserData>,
    doctors: Vec<DoctorData>,
    health_data: Vec<HealthRecordData>,
}

/// An in-memory stand-in for [PgDatabase](crate::PgDatabase), used in tests.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
    /// When set, every call fails as if the connection was lost
    offline: Mutex<bool>,
}

impl MemoryDatabase {
    pub fn go_offline(&self) {
        *self.offline.lock() = true;
    }

    pub fn record_count(&self) -> usize {
        self.tables.lock().health_data.len()
    }

    fn check_online(&self) -> Result<()> {
        if *self.offline.lock() {
            return Err(DatabaseError::Internal("connection lost".into()));
        }

        Ok(())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn user_by_username(&self, username: &str) -> Result<UserData> {
        self.check_online()?;

        self.tables
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "user",
                identifier: "username",
            })
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        self.ensure_username_available(&new_user.username).await?;

        let mut tables = self.tables.lock();
        let user = UserData {
            id: tables.users.len() as PrimaryKey + 1,
            username: new_user.username,
            password_hash: new_user.password_hash,
        };

        tables.users.push(user.clone());
        Ok(user)
    }

    async fn doctor_by_id(&self, doctor_id: PrimaryKey) -> Result<DoctorData> {
        self.check_online()?;

        self.tables
            .lock()
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "doctor",
                identifier: "id",
            })
    }

    async fn doctor_by_username(&self, username: &str) -> Result<DoctorData> {
        self.check_online()?;

        self.tables
            .lock()
            .doctors
            .iter()
            .find(|d| d.username == username)
            .cloned()
            .ok_or(DatabaseError::NotFound {
                resource: "doctor",
                identifier: "username",
            })
    }

    async fn list_doctors(&self) -> Result<Vec<DoctorData>> {
        self.check_online()?;

        Ok(self.tables.lock().doctors.clone())
    }

    async fn create_doctor(&self, new_doctor: NewDoctor) -> Result<DoctorData> {
        self.ensure_username_available(&new_doctor.username).await?;

        let mut tables = self.tables.lock();
        let doctor = DoctorData {
            id: tables.doctors.len() as PrimaryKey + 1,
            name: new_doctor.name,
            specialty: new_doctor.specialty,
            email: new_doctor.email,
            phone: new_doctor.phone,
            username: new_doctor.username,
            password_hash: new_doctor.password_hash,
        };

        tables.doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn create_health_record(&self, new_record: NewHealthRecord) -> Result<HealthRecordData> {
        self.check_online()?;

        let mut tables = self.tables.lock();

        if !tables.users.iter().any(|u| u.id == new_record.user_id) {
            return Err(DatabaseError::Internal("health_data.user_id violates foreign key".into()));
        }

        let record = HealthRecordData {
            id: tables.health_data.len() as PrimaryKey + 1,
            user_id: new_record.user_id,
            date_logged: Utc::now(),
            weight: new_record.weight,
            blood_pressure: new_record.blood_pressure,
            steps: new_record.steps,
        };

        tables.health_data.push(record.clone());
        Ok(record)
    }

    async fn health_records_by_user(&self, user_id: PrimaryKey) -> Result<Vec<HealthRecordData>> {
        self.check_online()?;

        let mut records: Vec<_> = self
            .tables
            .lock()
            .health_data
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();

        records.sort_by(|a, b| b.date_logged.cmp(&a.date_logged).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}
