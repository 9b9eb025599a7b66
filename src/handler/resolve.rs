//! Path resolution module
//!
//! Maps a request path onto the filesystem under the configured root,
//! with `.html` fallback. Resolved paths never leave the root: `..`
//! segments may not climb above it and symlinks pointing outside are
//! treated as missing.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use super::error::ServeError;
use crate::logger;

/// A filesystem entry a request resolved to
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub is_dir: bool,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl ResolvedTarget {
    fn new(path: PathBuf, metadata: &Metadata) -> Self {
        Self {
            path,
            is_dir: metadata.is_dir(),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        }
    }
}

/// Percent-decode a request path; undecodable input is used literally
pub fn decode_request_path(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

/// Lexically normalise a decoded request path into its segments
///
/// Empty and `.` segments are dropped and `..` removes the previous one.
/// Returns `None` when a `..` segment would climb above the top.
pub fn normalize_segments(request_path: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    for segment in request_path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }
    Some(segments)
}

/// Join a decoded request path onto `root`
///
/// Returns `None` when a `..` segment would climb above `root`.
pub fn join_within_root(root: &Path, request_path: &str) -> Option<PathBuf> {
    let segments = normalize_segments(request_path)?;
    Some(segments.into_iter().fold(root.to_path_buf(), |path, name| path.join(name)))
}

/// Resolve a raw request path to a filesystem entry under `root`
pub async fn resolve(
    root: &Path,
    raw_path: &str,
    html_fallback: bool,
) -> Result<ResolvedTarget, ServeError> {
    let decoded = decode_request_path(raw_path);
    let Some(path) = join_within_root(root, &decoded) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {raw_path}"));
        return Err(ServeError::NotFound);
    };

    logger::log_trace(&format!("Checking {}", path.display()));
    match stat_within_root(root, &path).await {
        Err(ServeError::NotFound) if html_fallback => {
            let mut html_path = path.into_os_string();
            html_path.push(".html");
            let html_path = PathBuf::from(html_path);
            logger::log_trace(&format!("Checking {}", html_path.display()));
            stat_within_root(root, &html_path).await
        }
        other => other,
    }
}

/// Stat `path` and confirm its real location is inside `root`
pub async fn stat_within_root(root: &Path, path: &Path) -> Result<ResolvedTarget, ServeError> {
    let metadata = fs::metadata(path).await?;
    let canonical_root = fs::canonicalize(root).await?;
    let canonical = fs::canonicalize(path).await?;
    if !canonical.starts_with(&canonical_root) {
        logger::log_warning(&format!(
            "Path escapes root, refusing: {} -> {}",
            path.display(),
            canonical.display()
        ));
        return Err(ServeError::NotFound);
    }
    Ok(ResolvedTarget::new(path.to_path_buf(), &metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_request_path() {
        assert_eq!(decode_request_path("/a%20b.txt"), "/a b.txt");
        assert_eq!(decode_request_path("/plain"), "/plain");
        // Invalid UTF-8 after decoding keeps the raw text
        assert_eq!(decode_request_path("/bad%FF"), "/bad%FF");
    }

    #[test]
    fn test_join_within_root() {
        let root = Path::new("/srv/www");
        assert_eq!(
            join_within_root(root, "/docs/./a.txt"),
            Some(PathBuf::from("/srv/www/docs/a.txt"))
        );
        assert_eq!(
            join_within_root(root, "/docs/../a.txt"),
            Some(PathBuf::from("/srv/www/a.txt"))
        );
        assert_eq!(join_within_root(root, "/"), Some(PathBuf::from("/srv/www")));
        assert_eq!(join_within_root(root, "/../etc/passwd"), None);
        assert_eq!(join_within_root(root, "/docs/../../etc/passwd"), None);
        assert_eq!(join_within_root(root, "/..\\..\\etc"), None);
    }

    #[test]
    fn test_normalize_segments() {
        assert_eq!(normalize_segments("/a//./b/"), Some(vec!["a", "b"]));
        assert_eq!(normalize_segments("/\"x\"/.."), Some(vec![]));
        assert_eq!(normalize_segments("/"), Some(vec![]));
        assert_eq!(normalize_segments("/a/../.."), None);
    }

    #[tokio::test]
    async fn test_resolve_file_and_html_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("about.html"), "<p>about</p>").unwrap();
        std::fs::write(dir.path().join("a b.txt"), "spaced").unwrap();

        let target = resolve(dir.path(), "/about", true).await.unwrap();
        assert_eq!(target.path, dir.path().join("about.html"));
        assert!(!target.is_dir);
        assert_eq!(target.len, 12);

        assert!(matches!(
            resolve(dir.path(), "/about", false).await,
            Err(ServeError::NotFound)
        ));

        let target = resolve(dir.path(), "/a%20b.txt", true).await.unwrap();
        assert_eq!(target.len, 6);
    }

    #[tokio::test]
    async fn test_resolve_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let target = resolve(dir.path(), "/sub/", true).await.unwrap();
        assert!(target.is_dir);
        let target = resolve(dir.path(), "/", true).await.unwrap();
        assert!(target.is_dir);
    }

    #[tokio::test]
    async fn test_resolve_rejects_traversal() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();

        assert!(matches!(
            resolve(&root, "/../secret.txt", true).await,
            Err(ServeError::NotFound)
        ));
        assert!(matches!(
            resolve(&root, "/%2e%2e/secret.txt", true).await,
            Err(ServeError::NotFound)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_symlink_out_of_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), root.join("link.txt")).unwrap();

        assert!(matches!(
            resolve(&root, "/link.txt", true).await,
            Err(ServeError::NotFound)
        ));
    }
}
