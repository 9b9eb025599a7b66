//! Minimal static-file HTTP server
//!
//! Serves a directory over HTTP/1.1 with optional `Last-Modified` /
//! `If-Modified-Since` support and optional directory listings.

pub mod cli;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
