//! Logging Infrastructure
//!
//! Structured logging setup for development and production.
//! Features:
//! - Daily rotating application logs (deleted after 14 days)
//! - Audit logs (`target: "audit"`), never deleted
//! - Security logs (`target: "security"`), never deleted

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Days an application log file is kept
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Clean up application log files older than [`APP_LOG_RETENTION_DAYS`]
///
/// Files are named `app.YYYY-MM-DD.log`. Audit and security logs are untouched.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff =
        chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if let Some(date_part) = name
            .strip_prefix("app.")
            .and_then(|d| d.strip_suffix(".log"))
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level or filter directive (`RUST_LOG` wins when set)
/// * `json_format` - JSON lines instead of the human-readable format
/// * `log_dir` - Optional directory for daily rolling files
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = vec![console_layer(level, json_format)];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        fs::create_dir_all(log_dir)?;

        let max_level = level.parse::<Level>().unwrap_or(Level::INFO);

        // 普通日志：排除 audit / security
        layers.push(file_layer(log_dir, "app", json_format, max_level, |target| {
            target != "audit" && target != "security"
        })?);
        layers.push(file_layer(log_dir, "audit", json_format, max_level, |target| {
            target == "audit"
        })?);
        layers.push(file_layer(
            log_dir,
            "security",
            json_format,
            max_level,
            |target| target == "security",
        )?);

        tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

fn console_layer(level: &str, json_format: bool) -> BoxedLayer {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed()
    }
}

fn file_layer(
    log_dir: &Path,
    prefix: &str,
    json_format: bool,
    max_level: Level,
    keep_target: fn(&str) -> bool,
) -> anyhow::Result<BoxedLayer> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir.join(prefix))?;
    let writer = Mutex::new(appender);
    let filter = filter_fn(move |meta| *meta.level() <= max_level && keep_target(meta.target()));

    let layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    };
    Ok(layer)
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}

/// Security log helper - records authentication and authorization events
///
/// Routed to the `security` log files, which are never deleted.
///
/// ```ignore
/// security_log!(WARN, "auth_failed", error = %e, uri = %uri);
/// security_log!(WARN, "permission_denied", user_id = %user.id, required_permission = "manage_roles");
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        )
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        )
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(
            target: "security",
            event = $event,
            timestamp = chrono::Local::now().to_rfc3339(),
            $($arg)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        let audit = dir.path().join("audit");
        fs::create_dir_all(&app).unwrap();
        fs::create_dir_all(&audit).unwrap();

        let today = chrono::Local::now().date_naive();
        let old = today - chrono::Duration::days(30);
        let old_name = format!("app.{}.log", old.format("%Y-%m-%d"));
        let fresh_name = format!("app.{}.log", today.format("%Y-%m-%d"));
        let audit_name = format!("audit.{}.log", old.format("%Y-%m-%d"));

        fs::write(app.join(&old_name), "x").unwrap();
        fs::write(app.join(&fresh_name), "x").unwrap();
        fs::write(app.join("notes.txt"), "x").unwrap();
        fs::write(audit.join(&audit_name), "x").unwrap();

        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 1);
        assert!(!app.join(&old_name).exists());
        assert!(app.join(&fresh_name).exists());
        assert!(app.join("notes.txt").exists());
        assert!(audit.join(&audit_name).exists());
    }

    #[test]
    fn cleanup_without_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 0);
    }
}
