mod auth;
mod db;
mod doctors;
mod history;
mod metrics;
mod registration;
mod tips;

use std::sync::Arc;

pub use auth::*;
pub use db::*;
pub use doctors::*;
pub use history::*;
pub use metrics::*;
pub use registration::*;
pub use tips::*;

/// The health tracker, bundling authentication, registration, metrics, and the doctor directory.
pub struct Tracker<Db> {
    pub auth: Authenticator<Db>,
    pub registrar: Registrar<Db>,
    pub metrics: MetricsRecorder<Db>,
    pub history: HistoryReader<Db>,
    pub doctors: DoctorDirectory<Db>,
}

impl<Db> Tracker<Db>
where
    Db: Database,
{
    pub fn new(database: Db) -> Self {
        let database = Arc::new(database);

        Self {
            auth: Authenticator::new(&database),
            registrar: Registrar::new(&database),
            metrics: MetricsRecorder::new(&database),
            history: HistoryReader::new(&database),
            doctors: DoctorDirectory::new(&database),
        }
    }
}
