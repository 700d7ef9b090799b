use std::{fmt::Display, path::Path};

use colored::Colorize;
use log::{Level, LevelFilter};

/// External crates only need to log warnings and errors
const ALLOWED_EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];
const ALLOWED_LEVELS: [Level; 3] = [Level::Info, Level::Warn, Level::Error];

/// Logs to `log_file`, since stdout belongs to the menus. Errors are echoed to stderr as well.
pub fn init_logger(log_file: &Path) -> Result<(), fern::InitError> {
    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {:<7} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                Target::from_str(record.target()).label(),
                message
            ))
        })
        .chain(fern::log_file(log_file)?);

    let stderr = fern::Dispatch::new()
        .level(LevelFilter::Error)
        .format(|out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:^5} {} {:^8} {}",
                level_to_string(&record.level()),
                now.format("%H:%M:%S").to_string().bright_black(),
                target,
                message
            ))
        })
        .chain(std::io::stderr());

    fern::Dispatch::new()
        .filter(|meta| {
            let target = Target::from_str(meta.target());

            let is_allowed = ALLOWED_LEVELS.contains(&meta.level());
            let is_severe = ALLOWED_EXTERNAL_LEVELS.contains(&meta.level());

            target.is_local() && is_allowed || is_severe
        })
        .chain(file)
        .chain(stderr)
        .apply()?;

    Ok(())
}

#[derive(Debug, PartialEq)]
enum Target {
    External(String),
    Core,
    Console,
    App,
}

impl Target {
    fn from_str(str: &str) -> Self {
        let module = str.split("::").next().unwrap_or_default();

        match module {
            "health_tracker_core" => Self::Core,
            "health_tracker_console" => Self::Console,
            "health_tracker" => Self::App,
            other => Target::External(other.to_string()),
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }

    fn label(&self) -> &str {
        match self {
            Target::External(x) => x.as_str(),
            Target::Core => "CORE",
            Target::Console => "CONSOLE",
            Target::App => "APP",
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = self.label();
        let result = match self {
            Target::External(_) => label.clear(),
            Target::Core => label.blue(),
            Target::Console => label.bright_purple(),
            Target::App => label.bright_green(),
        };

        Display::fmt(&result, f)
    }
}

fn level_to_string(level: &Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::Target;

    #[test]
    fn targets_by_crate() {
        assert_eq!(Target::from_str("health_tracker_core::auth"), Target::Core);
        assert_eq!(
            Target::from_str("health_tracker_console::controller"),
            Target::Console
        );
        assert_eq!(Target::from_str("health_tracker"), Target::App);
        assert_eq!(
            Target::from_str("sqlx::query"),
            Target::External("sqlx".to_string())
        );
        assert!(!Target::from_str("sqlx::query").is_local());
    }
}
