//! Filesystem error mapping
//!
//! Every filesystem failure in the request pipeline ends here and becomes
//! either a 404 or a 500. Nothing propagates past the responder.

use hyper::Response;
use std::fmt;
use std::io;
use std::path::Path;

use crate::http::{self, ResponseBody};
use crate::logger;

/// Failure to reach a file or directory on disk
#[derive(Debug)]
pub enum ServeError {
    /// The entry does not exist, or lies outside the root
    NotFound,
    /// Any other filesystem failure (permission, I/O)
    Access(io::Error),
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Not found"),
            Self::Access(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Access(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            // A path component that is a file ("a.txt/b") also means absent
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound,
            _ => Self::Access(err),
        }
    }
}

/// Turn a filesystem failure on `path` into a response
pub fn handle_serve_error(err: &ServeError, path: &Path) -> Response<ResponseBody> {
    match err {
        ServeError::NotFound => {
            logger::log_debug(&format!("{} not found", path.display()));
            http::build_404_response()
        }
        ServeError::Access(e) => {
            logger::log_warning(&format!(
                "Exception occurred when opening {}: {e}",
                path.display()
            ));
            http::build_500_response(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_from_io_error() {
        let err = ServeError::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ServeError::NotFound));

        let err = ServeError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ServeError::Access(_)));
    }

    #[test]
    fn test_status_mapping() {
        let response = handle_serve_error(&ServeError::NotFound, Path::new("/x"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let err = ServeError::Access(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let response = handle_serve_error(&err, Path::new("/x"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display() {
        assert_eq!(ServeError::NotFound.to_string(), "Not found");
        let err = ServeError::Access(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert_eq!(err.to_string(), "disk on fire");
    }
}
