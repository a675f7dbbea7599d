use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;

use replication_config::shared::ConfigError;

/// Returns whether terminal output should include backtraces.
fn should_render_backtrace() -> bool {
    matches!(
        std::env::var("RUST_BACKTRACE").as_deref(),
        Ok("1") | Ok("full")
    )
}

/// Result type for replicator operations.
pub type ReplicatorResult<T> = Result<T, ReplicatorError>;

/// Captured backtrace wrapper to avoid thiserror's unstable feature detection.
pub struct CapturedBacktrace(Backtrace);

impl CapturedBacktrace {
    fn capture() -> Self {
        Self(Backtrace::capture())
    }
}

impl fmt::Debug for CapturedBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for the replicator binary.
#[derive(Debug)]
pub enum ReplicatorError {
    /// The replicator request was rejected.
    Request(ConfigError),
    /// The service settings could not be loaded or are invalid.
    Config(Box<dyn Error + Send + Sync>, CapturedBacktrace),
    /// Reading the request or writing the result failed.
    Io(std::io::Error, CapturedBacktrace),
    /// The result could not be rendered as JSON.
    Serialization(serde_json::Error, CapturedBacktrace),
}

impl ReplicatorError {
    /// Returns a short category label for this error.
    pub fn category(&self) -> &'static str {
        match self {
            ReplicatorError::Request(_) => "request error",
            ReplicatorError::Config(_, _) => "configuration error",
            ReplicatorError::Io(_, _) => "i/o error",
            ReplicatorError::Serialization(_, _) => "serialization error",
        }
    }

    /// Returns the backtrace for this error.
    ///
    /// Request errors are expected client mistakes and carry none.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            ReplicatorError::Request(_) => None,
            ReplicatorError::Config(_, cb) => Some(&cb.0),
            ReplicatorError::Io(_, cb) => Some(&cb.0),
            ReplicatorError::Serialization(_, cb) => Some(&cb.0),
        }
    }

    /// Creates a configuration error from any boxed source.
    pub fn config<E: Error + Send + Sync + 'static>(err: E) -> Self {
        ReplicatorError::Config(Box::new(err), CapturedBacktrace::capture())
    }

    /// Returns a user-oriented report for terminal output.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        out.push_str("replicator failed\n");
        out.push_str(&format!("category: {}\n", self.category()));
        out.push_str(&format!("error: {}\n", self));

        let mut source = Error::source(self);
        let mut idx = 1usize;
        while let Some(err) = source {
            out.push_str(&format!("cause {idx}: {err}\n"));
            source = err.source();
            idx += 1;
        }

        if should_render_backtrace()
            && let Some(backtrace) = self.backtrace()
        {
            out.push_str("backtrace:\n");
            out.push_str(&backtrace.to_string());
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }

        out
    }
}

impl fmt::Display for ReplicatorError {
    /// Renders request errors verbatim so clients see the mapper's message unchanged.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplicatorError::Request(err) => write!(f, "{err}"),
            ReplicatorError::Config(source, _) => write!(f, "configuration error: {source}"),
            ReplicatorError::Io(source, _) => write!(f, "i/o error: {source}"),
            ReplicatorError::Serialization(source, _) => {
                write!(f, "serialization error: {source}")
            }
        }
    }
}

impl Error for ReplicatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReplicatorError::Request(err) => err.source(),
            ReplicatorError::Config(source, _) => Some(source.as_ref()),
            ReplicatorError::Io(source, _) => Some(source),
            ReplicatorError::Serialization(source, _) => Some(source),
        }
    }
}

impl From<ConfigError> for ReplicatorError {
    fn from(err: ConfigError) -> Self {
        ReplicatorError::Request(err)
    }
}

impl From<std::io::Error> for ReplicatorError {
    fn from(err: std::io::Error) -> Self {
        ReplicatorError::Io(err, CapturedBacktrace::capture())
    }
}

impl From<serde_json::Error> for ReplicatorError {
    fn from(err: serde_json::Error) -> Self {
        ReplicatorError::Serialization(err, CapturedBacktrace::capture())
    }
}
