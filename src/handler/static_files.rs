//! Static file serving module
//!
//! Streams a resolved file with its content type and cache headers,
//! answering conditional GETs with 304.

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, SERVER};
use hyper::{Response, StatusCode};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::error::{handle_serve_error, ServeError};
use super::resolve::ResolvedTarget;
use super::router::RequestContext;
use crate::config::Config;
use crate::http::cache::{self, CacheControl};
use crate::http::{self, mime, ResponseBody};
use crate::logger;

/// Serve a single file
///
/// The file handle lives only inside this call or the returned body, so it
/// is closed on the 304 path, on stream errors and when the client goes away.
pub async fn serve_file(
    ctx: &RequestContext,
    config: &Config,
    target: &ResolvedTarget,
) -> Response<ResponseBody> {
    let file = match File::open(&target.path).await {
        Ok(file) => file,
        Err(e) => return handle_serve_error(&ServeError::from(e), &target.path),
    };
    // Length of what this handle will stream, not of the earlier stat
    let len = match file.metadata().await {
        Ok(metadata) => metadata.len(),
        Err(e) => return handle_serve_error(&ServeError::from(e), &target.path),
    };

    let mut builder = Response::builder().header(CONTENT_TYPE, mime::content_type_for(&target.path));
    if let Some(name) = &config.http.server_name {
        builder = builder.header(SERVER, name);
    }

    if config.files.cache {
        if let Some(modified) = target.modified.map(cache::truncate_to_seconds) {
            builder = builder.header(LAST_MODIFIED, cache::format_http_date(modified));
            if cache::is_not_modified(ctx.if_modified_since.as_deref(), modified) {
                logger::log_debug(&format!(
                    "If-Modified-Since {} is not before {}, returning 304",
                    ctx.if_modified_since.as_deref().unwrap_or_default(),
                    cache::format_http_date(modified)
                ));
                return http::build_304_response(builder);
            }
        }
    }

    let cache_control = CacheControl::for_files(config.files.cache, config.files.max_age);
    let builder = builder
        .status(StatusCode::OK)
        .header(CONTENT_LENGTH, len)
        .header(CACHE_CONTROL, cache_control.to_header_value());

    let path = target.path.clone();
    let stream = ReaderStream::new(file)
        .inspect_err(move |e| {
            // Headers are already out; all that is left is to log and drop the connection
            logger::log_warning(&format!(
                "Exception occurred when streaming {}: {e}",
                path.display()
            ));
        })
        .map_ok(Frame::data);

    http::response::finish(builder, StreamBody::new(stream).boxed(), "200")
}
