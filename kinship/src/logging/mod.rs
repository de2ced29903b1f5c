//! Structured logging setup for Kinship.
//!
//! Builds a `tracing-subscriber` formatter from [`LoggingConfig`], honouring
//! `RUST_LOG` when it is set, and optionally mirrors events into a file via
//! `tracing-appender`.


use crate::config::{LogFormat, LoggingConfig};
use std::fmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Error type for logging operations
#[derive(Debug)]
pub enum LogError {
    /// IO error occurred
    IoError(std::io::Error),

    /// Error in subscriber setup
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::IoError(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LogError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LogError::SubscriberError(err)
    }
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::IoError(e) => write!(f, "IO error: {}", e),
            LogError::SubscriberError(e) => write!(f, "Subscriber error: {}", e),
        }
    }
}

impl std::error::Error for LogError {}

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Keeps the background file writer alive. Events written after the guard
/// is dropped are lost.
#[must_use = "dropping the guard stops file logging"]
#[derive(Default)]
pub struct LoggingGuard {
    file: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether a file writer is attached
    pub fn has_file_writer(&self) -> bool {
        self.file.is_some()
    }
}

impl fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingGuard")
            .field("file", &self.file.is_some())
            .finish()
    }
}

/// Initialize the global subscriber with the given configuration.
///
/// `RUST_LOG` replaces the configured level when set. Otherwise the
/// SurrealDB engine is held at `warn`.
///
/// Returns without error when a global subscriber is already installed, so
/// libraries and tests can call this more than once.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},surrealdb=warn,surrealdb_core=warn",
            config.level
        ))
    });

    let mut guard = LoggingGuard::default();
    let writer = match (&config.file, config.stdout) {
        (Some(path), true) => {
            let (file_writer, file_guard) = create_non_blocking_file(path)?;
            guard.file = Some(file_guard);
            BoxMakeWriter::new(std::io::stdout.and(file_writer))
        }
        (Some(path), false) => {
            let (file_writer, file_guard) = create_non_blocking_file(path)?;
            guard.file = Some(file_guard);
            BoxMakeWriter::new(file_writer)
        }
        (None, true) => BoxMakeWriter::new(std::io::stdout),
        (None, false) => BoxMakeWriter::new(std::io::sink),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_level(true)
        .with_target(true)
        .with_line_number(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Default => builder.try_init(),
    };

    match result {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already") => {
            tracing::debug!("Global subscriber already installed, keeping it");
            Ok(LoggingGuard::default())
        }
        Err(e) => Err(LogError::SubscriberError(e)),
    }
}

/// Create a non-blocking file writer.
fn create_non_blocking_file(path: impl AsRef<Path>) -> Result<(NonBlocking, WorkerGuard)> {
    let path = path.as_ref();

    let file_name = path.file_name().ok_or_else(|| {
        LogError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("log file path has no file name: {}", path.display()),
        ))
    })?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(file_appender))
}
