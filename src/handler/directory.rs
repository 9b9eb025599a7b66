//! Directory request handling
//!
//! With listing enabled a directory is answered with an HTML listing of
//! its entries. Otherwise it is served through its index file, or 404.

use html_escape::{encode_double_quoted_attribute, encode_text};
use hyper::Response;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

use super::error::{handle_serve_error, ServeError};
use super::resolve::{self, ResolvedTarget};
use super::router::RequestContext;
use super::static_files;
use crate::config::Config;
use crate::http::{self, ResponseBody};
use crate::logger;

/// Characters escaped in a single href path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Serve a directory: a listing when enabled, else its index file
pub async fn serve_directory(
    ctx: &RequestContext,
    config: &Config,
    dir: &ResolvedTarget,
) -> Response<ResponseBody> {
    if config.files.list {
        logger::log_trace(&format!("Listing {}", dir.path.display()));
        return match read_entries(&dir.path).await {
            Ok(entries) => http::build_html_response(render_listing(&ctx.path, &entries)),
            Err(e) => handle_serve_error(&ServeError::from(e), &dir.path),
        };
    }

    let index_path = dir.path.join(&config.files.index_file);
    match resolve::stat_within_root(&config.server.root, &index_path).await {
        Ok(index) if !index.is_dir => static_files::serve_file(ctx, config, &index).await,
        Ok(_) => handle_serve_error(&ServeError::NotFound, &index_path),
        Err(err) => handle_serve_error(&err, &index_path),
    }
}

/// Immediate entries of `dir`, sorted by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let is_dir = entry.file_type().await?.is_dir();
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Absolute href prefix for `segments`, always ending in `/`
fn href_prefix(segments: &[&str]) -> String {
    segments.iter().fold(String::from("/"), |mut prefix, segment| {
        let _ = write!(prefix, "{}/", utf8_percent_encode(segment, SEGMENT));
        prefix
    })
}

/// Render the listing page for `request_path` (still percent-encoded)
///
/// Links are built from the normalised path, never from the raw request.
pub fn render_listing(request_path: &str, entries: &[DirEntry]) -> String {
    let decoded = resolve::decode_request_path(request_path);
    let segments = resolve::normalize_segments(&decoded).unwrap_or_default();
    let base = href_prefix(&segments);

    let display = segments
        .iter()
        .fold(String::from("/"), |path, segment| format!("{path}{segment}/"));
    let title = encode_text(&display);

    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Index of {title}</title>\n</head>\n<body>\n<h1>Index of {title}</h1>\n<ul>\n"
    );
    if let Some((_, parent)) = segments.split_last() {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">../</a></li>",
            encode_double_quoted_attribute(&href_prefix(parent))
        );
    }
    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        let href = format!("{base}{}{suffix}", utf8_percent_encode(&entry.name, SEGMENT));
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}{suffix}</a></li>",
            encode_double_quoted_attribute(&href),
            encode_text(&entry.name),
        );
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        assert_eq!(
            entries,
            vec![
                DirEntry { name: "a.txt".to_string(), is_dir: false },
                DirEntry { name: "b.txt".to_string(), is_dir: false },
                DirEntry { name: "c".to_string(), is_dir: true },
            ]
        );
    }

    #[test]
    fn test_render_listing() {
        let entries = vec![
            DirEntry { name: "a b.txt".to_string(), is_dir: false },
            DirEntry { name: "sub".to_string(), is_dir: true },
        ];
        let html = render_listing("/docs", &entries);
        assert!(html.contains("<title>Index of /docs/</title>"));
        assert!(html.contains("<a href=\"/docs/a%20b.txt\">a b.txt</a>"));
        assert!(html.contains("<a href=\"/docs/sub/\">sub/</a>"));
        assert!(html.contains("<a href=\"/\">../</a>"));
    }

    #[test]
    fn test_parent_link_is_absolute() {
        let html = render_listing("/a/b", &[]);
        assert!(html.contains("<a href=\"/a/\">../</a>"));
        let html = render_listing("/a/b/", &[]);
        assert!(html.contains("<a href=\"/a/\">../</a>"));
    }

    #[test]
    fn test_request_path_cannot_break_out_of_href() {
        let entries = vec![DirEntry { name: "a.txt".to_string(), is_dir: false }];

        let html = render_listing("/\"onmouseover=\"alert(1)/..", &entries);
        assert!(!html.contains("onmouseover"));
        assert!(html.contains("<a href=\"/a.txt\">a.txt</a>"));

        let html = render_listing("/x%22y/", &entries);
        assert!(html.contains("<a href=\"/x%22y/a.txt\">a.txt</a>"));
        assert!(html.contains("<a href=\"/\">../</a>"));
        assert!(!html.contains("href=\"/x\"y"));
    }

    #[test]
    fn test_ampersand_in_name_is_attribute_escaped() {
        let entries = vec![DirEntry { name: "a&b.txt".to_string(), is_dir: false }];
        let html = render_listing("/", &entries);
        assert!(html.contains("<a href=\"/a&amp;b.txt\">a&amp;b.txt</a>"));
    }

    #[test]
    fn test_render_root_has_no_parent_link() {
        let html = render_listing("/", &[]);
        assert!(!html.contains("../"));
        assert!(html.contains("Index of /"));
    }

    #[test]
    fn test_names_are_escaped() {
        let entries = vec![DirEntry { name: "<script>".to_string(), is_dir: false }];
        let html = render_listing("/", &entries);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("href=\"/%3Cscript%3E\""));
        assert!(!html.contains("<script>"));
    }
}
