//! Request dispatch module
//!
//! Entry point for HTTP request processing: method check, path resolution,
//! then the file or directory branch. Every response leaves wrapped in a
//! `RecordingBody` so the access log sees its final status and size.

use hyper::header::IF_MODIFIED_SINCE;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::error::handle_serve_error;
use super::{directory, resolve, static_files};
use crate::config::Config;
use crate::http::{self, AccessLog, RecordingBody, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Request path, still percent-encoded, without the query
    pub path: String,
    /// Request target as received, for logging
    pub uri: String,
    pub if_modified_since: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();
        Self {
            method: req.method().clone(),
            path: uri.path().to_string(),
            uri: uri
                .path_and_query()
                .map_or_else(|| uri.to_string(), ToString::to_string),
            if_modified_since: req
                .headers()
                .get(IF_MODIFIED_SINCE)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    config: Arc<Config>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<RecordingBody<ResponseBody>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);
    let access_log = config.logging.access_log.then(|| {
        let entry = AccessLogEntry::new(
            remote_addr.map_or_else(|| "-".to_string(), |a| a.to_string()),
            ctx.method.to_string(),
            ctx.uri.clone(),
            format!("{:?}", req.version()),
        );
        AccessLog::new(entry, config.logging.access_log_format.as_str(), started)
    });
    drop(req);

    let response = route_request(&ctx, &config).await;
    let (parts, body) = response.into_parts();
    let body = RecordingBody::new(body, parts.status, access_log);
    Ok(Response::from_parts(parts, body))
}

/// Decide the response for one request
///
/// Nothing here writes headers; it only checks and hands off.
pub async fn route_request(ctx: &RequestContext, config: &Config) -> Response<ResponseBody> {
    // 1. Only GET is served, before touching the filesystem
    if ctx.method != Method::GET {
        logger::log_debug(&format!("Method not allowed: {}", ctx.method));
        return http::build_405_response();
    }

    // 2. Resolve the path under the root
    let target = match resolve::resolve(
        &config.server.root,
        &ctx.path,
        config.files.html_fallback,
    )
    .await
    {
        Ok(target) => target,
        Err(err) => {
            let decoded = resolve::decode_request_path(&ctx.path);
            return handle_serve_error(&err, Path::new(&*decoded));
        }
    };

    // 3. Dispatch on entry type
    if target.is_dir {
        logger::log_trace(&format!("{} is directory", target.path.display()));
        directory::serve_directory(ctx, config, &target).await
    } else {
        logger::log_trace(&format!("{} is file", target.path.display()));
        static_files::serve_file(ctx, config, &target).await
    }
}
