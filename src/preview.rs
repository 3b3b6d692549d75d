//! Server-side previews: syntax-highlighted source and rendered Markdown.
//!
//! Uses syntect for highlighting and comrak for CommonMark. Both are
//! synchronous, so rendering happens on a blocking thread.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use comrak::plugins::syntect::SyntectAdapter;
use comrak::{Options, Plugins, markdown_to_html_with_plugins};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tokio::fs;
use tracing::debug;

use crate::error::BrowserError;
use crate::filetypes::{self, PreviewKind};
use crate::render::PreviewBody;

const FALLBACK_THEME: &str = "base16-ocean.dark";

// Lazy-loaded syntax highlighting assets
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);
static SYNTECT_ADAPTER: LazyLock<SyntectAdapter> =
    LazyLock::new(|| SyntectAdapter::new(Some(FALLBACK_THEME)));

fn internal(err: impl std::fmt::Display) -> BrowserError {
    BrowserError::Internal(err.to_string())
}

/// Build the preview body for the file at `path`.
///
/// Text previews are skipped for files over `max_bytes` and for content that
/// is not UTF-8. With `source` set, Markdown is highlighted as text instead
/// of rendered.
pub async fn build_preview(
    path: PathBuf,
    name: &str,
    max_bytes: u64,
    theme: &str,
    source: bool,
) -> Result<PreviewBody, BrowserError> {
    let kind = filetypes::preview_kind(name);
    match kind {
        PreviewKind::Image => return Ok(PreviewBody::Image),
        PreviewKind::Unsupported => return Ok(PreviewBody::Unavailable),
        PreviewKind::Text | PreviewKind::Markdown => {}
    }

    let metadata = fs::metadata(&path).await.map_err(|e| BrowserError::from_io(&e))?;
    if metadata.len() > max_bytes {
        debug!(
            "Preview skipped for {}: {} bytes exceeds {}",
            path.display(),
            metadata.len(),
            max_bytes
        );
        return Ok(PreviewBody::Unavailable);
    }

    let bytes = fs::read(&path).await.map_err(|e| BrowserError::from_io(&e))?;
    let Ok(content) = String::from_utf8(bytes) else {
        return Ok(PreviewBody::Unavailable);
    };

    let name = name.to_string();
    let theme = theme.to_string();
    let html = tokio::task::spawn_blocking(move || match kind {
        PreviewKind::Markdown if !source => Ok(render_markdown(&content)),
        _ => highlight_code(&content, Path::new(&name), &theme),
    })
    .await??;

    Ok(PreviewBody::Html(html))
}

/// Render Markdown to HTML; raw HTML in the source is escaped.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.escape = true;

    let mut plugins = Plugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&*SYNTECT_ADAPTER);

    let html = markdown_to_html_with_plugins(content, &options, &plugins);
    format!("<div class=\"markdown-preview\">{html}</div>")
}

/// Highlight code using syntect
pub fn highlight_code(content: &str, path: &Path, theme_name: &str) -> Result<String, BrowserError> {
    let syntax = path
        .extension()
        .and_then(|ext| SYNTAX_SET.find_syntax_by_extension(ext.to_str().unwrap_or("")))
        .or_else(|| SYNTAX_SET.find_syntax_by_first_line(content))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let theme = THEME_SET
        .themes
        .get(theme_name)
        .or_else(|| THEME_SET.themes.get(FALLBACK_THEME))
        .ok_or_else(|| internal("no highlighting theme available"))?;

    let background = theme
        .settings
        .background
        .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
        .unwrap_or_else(|| "#2b303b".to_string());

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut html_output = String::with_capacity(content.len() * 2);

    // Table layout keeps line numbers aligned with wrapped code
    html_output.push_str(&format!(
        "<table class=\"highlighted-code\" style=\"background: {background}; font-family: ui-monospace, SFMono-Regular, Consolas, Menlo, monospace; font-size: 13px; line-height: 1.5; border-collapse: collapse; width: 100%;\"><tbody>"
    ));

    for (i, line) in LinesWithEndings::from(content).enumerate() {
        let regions = highlighter
            .highlight_line(line, &SYNTAX_SET)
            .map_err(internal)?;
        let html_line =
            styled_line_to_highlighted_html(&regions[..], IncludeBackground::No).map_err(internal)?;

        html_output.push_str("<tr>");
        html_output.push_str(&format!(
            "<td style=\"text-align: right; padding-right: 0.75em; min-width: 2.5em; color: #6b7280; user-select: none; vertical-align: top;\">{}</td>",
            i + 1
        ));
        html_output.push_str("<td style=\"white-space: pre-wrap; vertical-align: top;\">");
        if html_line.trim().is_empty() {
            html_output.push(' ');
        } else {
            html_output.push_str(html_line.trim_end_matches('\n'));
        }
        html_output.push_str("</td></tr>");
    }

    html_output.push_str("</tbody></table>");

    Ok(html_output)
}
