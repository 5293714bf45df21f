//! Unified error type.

use std::fmt;

/// The error type returned by janus's fallible operations.
///
/// Application-level failures (404, 400, etc.) are HTTP
/// [`Response`](crate::Response) values, not `Error`s. This type surfaces
/// lifecycle failures: binding the listener, materializing a route table,
/// or starting a platform that is already serving.
#[derive(Debug)]
pub enum Error {
    /// Listener bind or socket failure. A taken port lands here, directly
    /// from `start` — there is no retry.
    Io(std::io::Error),
    /// The deferred backend could not materialize its route table, e.g. two
    /// registrations competing for one tree position.
    Route(String),
    /// `start` was called while the platform is already serving.
    AlreadyRunning,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Route(msg) => write!(f, "route: {msg}"),
            Self::AlreadyRunning => f.write_str("platform is already running"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
