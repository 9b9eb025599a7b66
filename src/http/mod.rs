//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! file resolution logic in `handler`.

pub mod cache;
pub mod mime;
pub mod recorder;
pub mod response;

// Re-export commonly used types
pub use recorder::{AccessLog, RecordingBody, ResponseOutcome};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_html_response, ResponseBody,
};
