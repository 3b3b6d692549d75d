use std::path::Path;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::AppState;
use crate::breadcrumb;
use crate::catalog::{self, EntryKind};
use crate::error::BrowserError;
use crate::filetypes::{self, PreviewKind};
use crate::preview;
use crate::render::{self, ListingPage, MarkdownView, PreviewPage};
use crate::resolver::{PathResolver, ResolvedPath};
use crate::sort::{self, SortSpec};

/// Query parameters understood on any path
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    /// Listing sort field: name, time or type
    pub sort: Option<String>,
    /// Listing direction: asc or desc
    pub order: Option<String>,
    /// Present to get an HTML preview instead of raw bytes; `source` shows
    /// Markdown as highlighted text
    pub preview: Option<String>,
    /// Case-insensitive substring filter on listed names
    pub q: Option<String>,
}

/// What a request turns into once its path has been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Directory addressed without a trailing slash; carries the Location
    Redirect(String),
    Listing {
        dir: ResolvedPath,
        sort: SortSpec,
        filter: Option<String>,
    },
    Stream(ResolvedPath),
    Preview { file: ResolvedPath, source: bool },
}

/// Decide how to answer `uri`.
///
/// Directories must be addressed with a trailing slash; otherwise the client
/// is redirected to the slashed path with the query string kept verbatim.
/// The Location is rebuilt from the normalized path, so `//host` style
/// requests never produce a protocol-relative redirect. Files addressed with
/// a trailing slash don't exist.
pub fn plan(resolver: &PathResolver, uri: &Uri) -> Result<Route, BrowserError> {
    let raw_path = uri.path();
    let resolved = resolver.resolve(raw_path)?;
    let query = Query::<BrowseQuery>::try_from_uri(uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    let has_slash = raw_path.ends_with('/');

    match resolved.kind() {
        EntryKind::Directory if !has_slash => {
            let mut location = breadcrumb::directory_url(resolved.relative());
            if let Some(q) = uri.query() {
                location.push('?');
                location.push_str(q);
            }
            Ok(Route::Redirect(location))
        }
        EntryKind::Directory => Ok(Route::Listing {
            dir: resolved,
            sort: SortSpec::from_params(query.sort.as_deref(), query.order.as_deref()),
            filter: query
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
        }),
        EntryKind::File if has_slash => Err(BrowserError::NotFound),
        EntryKind::File if query.preview.is_some() => Ok(Route::Preview {
            file: resolved,
            source: query.preview.as_deref() == Some("source"),
        }),
        EntryKind::File => Ok(Route::Stream(resolved)),
    }
}

/// GET /{*path} - Listing, redirect, raw file or preview
pub async fn browse(State(state): State<AppState>, uri: Uri) -> Result<Response, BrowserError> {
    let route = plan(&state.resolver, &uri)?;
    debug!("{} -> {:?}", uri, route);

    match route {
        Route::Redirect(location) => Ok((
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, location)],
        )
            .into_response()),
        Route::Listing { dir, sort, filter } => {
            list_directory(&state, dir, sort, filter.as_deref()).await
        }
        Route::Stream(file) => stream_file(&file).await,
        Route::Preview { file, source } => preview_file(&state, &file, source).await,
    }
}

async fn list_directory(
    state: &AppState,
    dir: ResolvedPath,
    spec: SortSpec,
    filter: Option<&str>,
) -> Result<Response, BrowserError> {
    let catalog = state.catalog.clone();
    let listed = dir.clone();
    let mut entries = tokio::task::spawn_blocking(move || catalog.list(&listed)).await??;
    if let Some(needle) = filter {
        entries = catalog::filter_by_name(entries, needle);
    }
    let entries = sort::order(entries, spec);

    debug!(
        "Listing {} ({} entries, {:?})",
        dir.fs_path().display(),
        entries.len(),
        spec
    );

    let html = render::render_listing(&ListingPage {
        root_title: &state.config.title,
        relative: dir.relative(),
        entries: &entries,
        sort: spec,
        filter,
    });

    Ok(Html(html).into_response())
}

/// Stream a regular file without loading it into memory.
async fn stream_file(file: &ResolvedPath) -> Result<Response, BrowserError> {
    let path = file.fs_path();
    debug!("Streaming file: {}", path.display());

    let handle = fs::File::open(path)
        .await
        .map_err(|e| BrowserError::from_io(&e))?;
    // Length from the open handle, so it matches the bytes we send
    let file_size = handle
        .metadata()
        .await
        .map_err(|e| BrowserError::from_io(&e))?
        .len();

    let body = Body::from_stream(ReaderStream::new(handle));

    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let file_name = file
        .relative()
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    // Sanitize filename for Content-Disposition header
    let safe_filename: String = file_name
        .chars()
        .map(|c| if c == '"' || c.is_control() { '\'' } else { c })
        .collect();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_LENGTH, file_size.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", safe_filename),
            ),
        ],
        body,
    )
        .into_response())
}

async fn preview_file(
    state: &AppState,
    file: &ResolvedPath,
    source: bool,
) -> Result<Response, BrowserError> {
    let relative = file.relative();
    let parent = relative.parent().unwrap_or(Path::new(""));
    let raw_name = relative.file_name().unwrap_or_default();
    let file_name = raw_name.to_string_lossy().to_string();

    let body = preview::build_preview(
        file.fs_path().to_path_buf(),
        &file_name,
        state.config.preview_max_bytes,
        &state.config.highlight_theme,
        source,
    )
    .await?;

    let raw_url = breadcrumb::entry_url(parent, raw_name, false);
    let back_url = breadcrumb::directory_url(parent);
    let markdown_view = (filetypes::preview_kind(&file_name) == PreviewKind::Markdown).then_some(
        if source {
            MarkdownView::Source
        } else {
            MarkdownView::Rendered
        },
    );

    let html = render::render_preview(&PreviewPage {
        file_name: &file_name,
        raw_url: &raw_url,
        back_url: &back_url,
        markdown_view,
        body,
    });

    Ok(Html(html).into_response())
}
