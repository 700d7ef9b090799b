use std::process::ExitCode;

use colored::Colorize;
use config::{Config, ConfigError};
use health_tracker_console::{Console, ConsoleError, Exit, InteractiveTerminal, Intro};
use health_tracker_core::{DatabaseError, PgDatabase, Tracker};
use log::{error, info, warn};
use thiserror::Error;
use tokio::runtime::{self, Runtime};

mod config;
mod logging;

pub struct HealthTracker {
    config: Config,
    tracker: Tracker<PgDatabase>,
    runtime: Runtime,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not initialize logging: {0}")]
    Logging(#[from] fern::InitError),

    #[error("Could not initialize database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl HealthTracker {
    fn new(config: Config) -> Result<Self, StartupError> {
        info!("Building async runtime...");
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StartupError::Fatal(e.to_string()))?;

        info!("Connecting to database...");
        let database = runtime.block_on(PgDatabase::new(&config.database_url))?;
        runtime.block_on(database.create_schema())?;

        Ok(Self {
            config,
            tracker: Tracker::new(database),
            runtime,
        })
    }

    fn run(&self) -> ExitCode {
        let terminal = InteractiveTerminal::new();

        if self.config.intro && terminal.term().is_term() {
            let intro = Intro::new(self.config.typing_delay);

            if let Err(e) = intro.run(terminal.term()) {
                warn!("Intro could not be shown: {}", e);
            }
        }

        let mut console = Console::new(&self.tracker, &self.runtime, terminal);

        match console.run() {
            Ok(Exit::Requested) => {
                info!("Exited on request");
                ExitCode::SUCCESS
            }
            Ok(Exit::LockedOut) => ExitCode::FAILURE,
            Err(ConsoleError::InputClosed) => {
                info!("Input closed, exiting");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("The console stopped unexpectedly: {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

impl StartupError {
    fn hint(&self) -> String {
        match self {
            StartupError::Config(_) => "Check the HEALTH_TRACKER_* environment variables and your .env file.".to_string(),
            StartupError::Logging(_) => "Make sure the directory of HEALTH_TRACKER_LOG_FILE exists and is writable.".to_string(),
            StartupError::Database(_) => "This is a database error. Make sure PostgreSQL is running and HEALTH_TRACKER_DATABASE_URL points to it, then try again.".to_string(),
            StartupError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn report(error: &StartupError) {
    error!(
        "{} Read the error below to troubleshoot the issue.",
        "Health Tracker failed to start!".bold().red()
    );
    error!("{}", error);
    error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
}

fn start() -> Result<HealthTracker, StartupError> {
    let config = Config::from_env()?;
    logging::init_logger(&config.log_file)?;

    HealthTracker::new(config)
}

fn main() -> ExitCode {
    match start() {
        Ok(tracker) => {
            info!("Initialized successfully.");
            tracker.run()
        }
        // Without a logger there is nowhere else to report to
        Err(error @ (StartupError::Config(_) | StartupError::Logging(_))) => {
            eprintln!("{} {}", "Health Tracker failed to start!".bold().red(), error);
            eprintln!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
            ExitCode::FAILURE
        }
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}
