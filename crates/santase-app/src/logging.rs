use std::fs::{self, File};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the background log writer alive; drop it last.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

pub fn init_logging(logging: &LoggingConfig) -> Result<LoggingGuard> {
    let (writer, guard) = match logging.file.as_ref() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory at {}", parent.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating log file at {}", path.display()))?;
            non_blocking::NonBlockingBuilder::default()
                .lossy(false)
                .finish(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let level = logging.level().unwrap_or(Level::WARN);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if logging.enable_structured {
        install(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .json()
                .with_current_span(false)
                .with_span_events(FmtSpan::NONE)
                .with_writer(writer)
                .finish(),
        );
    } else {
        install(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer)
                .finish(),
        );
    }

    Ok(LoggingGuard { _guard: guard })
}

fn install<S>(subscriber: S)
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    // A global subscriber may already be set, e.g. by a test harness.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use crate::config::LoggingConfig;

    #[test]
    fn creates_log_file_and_parent_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs").join("santase.jsonl");
        let config = LoggingConfig {
            enable_structured: true,
            tracing_level: "info".to_string(),
            file: Some(path.clone()),
        };
        let guard = init_logging(&config).expect("init");
        tracing::info!(target: "santase_app::service", "hello");
        drop(guard);
        assert!(path.exists());
    }
}
