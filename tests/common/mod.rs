//! Test utilities and common setup.

use std::path::Path;
use std::time::{Duration, SystemTime};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use tempfile::TempDir;
use tower::ServiceExt;
use workspace_browser::AppState;

/// A temporary workspace plus a router serving it.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub app: Router,
}

impl TestWorkspace {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .method(Method::GET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Workspace layout used by most tests:
///
/// ```text
/// docs/guide.md
/// empty/
/// zdir/
/// A.txt
/// b.txt
/// .secret
/// ```
pub fn test_workspace() -> TestWorkspace {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::create_dir_all(root.join("empty")).unwrap();
    std::fs::create_dir_all(root.join("zdir")).unwrap();
    std::fs::write(root.join("docs/guide.md"), "# Guide\n\nSome *text*.\n").unwrap();
    std::fs::write(root.join("A.txt"), "upper").unwrap();
    std::fs::write(root.join("b.txt"), "lower").unwrap();
    std::fs::write(root.join(".secret"), "hidden but fetchable").unwrap();

    let state = AppState::new(root).unwrap();
    TestWorkspace {
        app: workspace_browser::app(state),
        dir,
    }
}

/// Set the modification time of `path` to `secs` after the epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    let file = std::fs::File::open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Names of the listed entries in page order, parent row excluded.
pub fn listed_names(html: &str) -> Vec<String> {
    html.split("<a class=\"file-name\" href=\"")
        .skip(1)
        .filter_map(|chunk| {
            let (_, rest) = chunk.split_once("\">")?;
            let (name, _) = rest.split_once("</a>")?;
            Some(name.trim_end_matches('/').to_string())
        })
        .filter(|name| name != "..")
        .collect()
}
