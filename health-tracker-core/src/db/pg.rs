use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, query, query_as, Error as SqlxError, FromRow, PgPool};

use crate::{
    Database, DatabaseError, DoctorData, HealthRecordData, IntoDatabaseError,
    NewDoctor, NewHealthRecord, NewUser, PrimaryKey, Result, UserData,
};

const SCHEMA: &str = include_str!("schema.sql");

/// A postgres database implementation for the tracker
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    /// Connects to the database. A single connection is held for the lifetime of the process.
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| e.any())?;

        Ok(Self { pool })
    }

    /// Creates any missing tables. Existing tables are never altered.
    pub async fn create_schema(&self) -> Result<()> {
        let statements = SCHEMA
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty());

        for statement in statements {
            query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| e.any())?;
        }

        Ok(())
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password_hash: String,
}

#[derive(FromRow)]
struct DoctorRow {
    id: i32,
    name: String,
    specialty: String,
    email: String,
    phone: String,
    username: String,
    password_hash: String,
}

#[derive(FromRow)]
struct HealthRecordRow {
    id: i32,
    user_id: i32,
    date_logged: DateTime<Utc>,
    weight: f64,
    blood_pressure: String,
    steps: i64,
}

impl From<UserRow> for UserData {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

impl TryFrom<DoctorRow> for DoctorData {
    type Error = DatabaseError;

    fn try_from(row: DoctorRow) -> Result<Self> {
        let specialty = row
            .specialty
            .parse()
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            specialty,
            email: row.email,
            phone: row.phone,
            username: row.username,
            password_hash: row.password_hash,
        })
    }
}

impl TryFrom<HealthRecordRow> for HealthRecordData {
    type Error = DatabaseError;

    fn try_from(row: HealthRecordRow) -> Result<Self> {
        let blood_pressure = row
            .blood_pressure
            .parse()
            .map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        let steps = u64::try_from(row.steps).map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            date_logged: row.date_logged,
            weight: row.weight,
            blood_pressure,
            steps,
        })
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn user_by_username(&self, username: &str) -> Result<UserData> {
        query_as::<_, UserRow>("SELECT id, username, password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map(UserData::from)
            .map_err(|e| e.not_found_or("user", "username"))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserData> {
        self.ensure_username_available(&new_user.username).await?;

        query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id, username, password_hash",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map(UserData::from)
        .map_err(|e| e.conflict_or("user", "username", &new_user.username))
    }

    async fn doctor_by_id(&self, doctor_id: PrimaryKey) -> Result<DoctorData> {
        query_as::<_, DoctorRow>("SELECT * FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("doctor", "id"))?
            .try_into()
    }

    async fn doctor_by_username(&self, username: &str) -> Result<DoctorData> {
        query_as::<_, DoctorRow>("SELECT * FROM doctors WHERE username = $1")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| e.not_found_or("doctor", "username"))?
            .try_into()
    }

    async fn list_doctors(&self) -> Result<Vec<DoctorData>> {
        query_as::<_, DoctorRow>("SELECT * FROM doctors ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.any())?
            .into_iter()
            .map(DoctorData::try_from)
            .collect()
    }

    async fn create_doctor(&self, new_doctor: NewDoctor) -> Result<DoctorData> {
        self.ensure_username_available(&new_doctor.username).await?;

        query_as::<_, DoctorRow>(
            "
            INSERT INTO doctors (name, specialty, email, phone, username, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *",
        )
        .bind(&new_doctor.name)
        .bind(new_doctor.specialty.to_string())
        .bind(&new_doctor.email)
        .bind(&new_doctor.phone)
        .bind(&new_doctor.username)
        .bind(&new_doctor.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.conflict_or("doctor", "username", &new_doctor.username))?
        .try_into()
    }

    async fn create_health_record(&self, new_record: NewHealthRecord) -> Result<HealthRecordData> {
        let steps =
            i64::try_from(new_record.steps).map_err(|e| DatabaseError::Internal(Box::new(e)))?;

        query_as::<_, HealthRecordRow>(
            "
            INSERT INTO health_data (user_id, weight, blood_pressure, steps)
            VALUES ($1, $2, $3, $4)
            RETURNING *",
        )
        .bind(new_record.user_id)
        .bind(new_record.weight)
        .bind(new_record.blood_pressure.to_string())
        .bind(steps)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.any())?
        .try_into()
    }

    async fn health_records_by_user(&self, user_id: PrimaryKey) -> Result<Vec<HealthRecordData>> {
        query_as::<_, HealthRecordRow>(
            "SELECT * FROM health_data WHERE user_id = $1 ORDER BY date_logged DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| e.any())?
        .into_iter()
        .map(HealthRecordData::try_from)
        .collect()
    }
}

impl IntoDatabaseError for SqlxError {
    fn any(self) -> DatabaseError {
        DatabaseError::Internal(Box::new(self))
    }

    fn not_found_or(self, resource: &'static str, identifier: &'static str) -> DatabaseError {
        match self {
            SqlxError::RowNotFound => DatabaseError::NotFound {
                resource,
                identifier,
            },
            e => Self::any(e),
        }
    }

    fn conflict_or(self, resource: &'static str, field: &'static str, value: &str) -> DatabaseError {
        match self {
            SqlxError::Database(e) if e.is_unique_violation() => DatabaseError::Conflict {
                resource,
                field,
                value: value.to_string(),
            },
            e => Self::any(e),
        }
    }
}
