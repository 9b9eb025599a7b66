//! Request handler module
//!
//! Maps each request onto the content root: dispatch, path resolution,
//! file and directory responders, and the shared error mapping.

pub mod directory;
pub mod error;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use error::ServeError;
pub use resolve::ResolvedTarget;
pub use router::{handle_request, RequestContext};
