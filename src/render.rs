//! HTML pages for directory listings and file previews.

use std::fmt::Write;
use std::path::Path;

use crate::breadcrumb::{self, Breadcrumb};
use crate::catalog::DirEntry;
use crate::filetypes::{self, PreviewKind};
use crate::sort::{SortDirection, SortField, SortSpec};

const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #1a1a2e; color: #eee; }
a { color: #00d9ff; text-decoration: none; }
a:hover { text-decoration: underline; }
.header { background: #16213e; padding: 10px 20px; border-bottom: 1px solid #0f3460; display: flex; align-items: center; gap: 15px; }
.header h1 { font-size: 16px; color: #00d9ff; }
.breadcrumb { font-size: 13px; color: #888; }
.toolbar { padding: 6px 20px; border-bottom: 1px solid #0f3460; font-size: 12px; color: #666; display: flex; gap: 8px; }
.toolbar a { padding: 2px 8px; border-radius: 4px; color: #888; }
.toolbar a.active { color: #00d9ff; background: #0f3460; }
.search input[type=text] { background: #16213e; border: 1px solid #0f3460; color: #eee; padding: 2px 6px; border-radius: 4px; }
.file-list { list-style: none; }
.file-item { display: grid; grid-template-columns: 28px 1fr 110px 90px 130px 60px; padding: 6px 20px; border-bottom: 1px solid #16213e; font-size: 13px; }
.file-item:hover { background: #16213e; }
.file-type, .file-size, .file-modified { color: #888; }
.empty { padding: 20px; color: #666; }
.preview-body { padding: 16px 20px; }
.markdown-preview { line-height: 1.6; }
.markdown-preview pre { padding: 10px; overflow-x: auto; }
.image-preview { max-width: 100%; }
"#;

/// Escape text for HTML bodies and quoted attributes
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub struct ListingPage<'a> {
    /// Title used at the workspace root
    pub root_title: &'a str,
    /// Directory being listed, relative to the root
    pub relative: &'a Path,
    /// Entries in display order
    pub entries: &'a [DirEntry],
    pub sort: SortSpec,
    /// Active name filter, already applied to `entries`
    pub filter: Option<&'a str>,
}

impl ListingPage<'_> {
    fn title(&self) -> String {
        self.relative
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root_title.to_string())
    }
}

pub enum PreviewBody {
    /// Pre-rendered, already escaped HTML
    Html(String),
    Image,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownView {
    Rendered,
    Source,
}

pub struct PreviewPage<'a> {
    pub file_name: &'a str,
    pub raw_url: &'a str,
    pub back_url: &'a str,
    /// Set for Markdown files; the page links to the other view
    pub markdown_view: Option<MarkdownView>,
    pub body: PreviewBody,
}

fn page(title: &str, header: &str, main: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"header\">{header}</div>\n{main}\n</body>\n</html>\n",
        title = html_escape(title),
    )
}

fn render_breadcrumbs(crumbs: &[Breadcrumb]) -> String {
    let mut html = String::from("<a href=\"/\">Home</a>");
    for crumb in crumbs {
        let _ = write!(
            html,
            " / <a href=\"{}\">{}</a>",
            html_escape(&crumb.url),
            html_escape(&crumb.label)
        );
    }
    html
}

/// Query string for a listing link, keeping the name filter.
fn listing_query(spec: SortSpec, filter: Option<&str>) -> String {
    let mut query = spec.query_string();
    if let Some(q) = filter {
        query.push_str("&q=");
        query.push_str(&urlencoding::encode(q));
    }
    query
}

fn render_search_form(current: SortSpec, filter: Option<&str>) -> String {
    format!(
        "<form class=\"search\" method=\"get\">\
<input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"Filter names\">\
<input type=\"hidden\" name=\"sort\" value=\"{}\">\
<input type=\"hidden\" name=\"order\" value=\"{}\"></form>",
        html_escape(filter.unwrap_or("")),
        current.field.as_str(),
        current.direction.as_str()
    )
}

fn render_toolbar(current: SortSpec, filter: Option<&str>) -> String {
    let mut html = String::from("<div class=\"toolbar\">");
    html.push_str(&render_search_form(current, filter));
    html.push_str("<span>Sort:</span>");
    for field in SortField::ALL {
        let target = current.toggled(field);
        let (class, marker) = if current.field == field {
            let arrow = match current.direction {
                SortDirection::Asc => " ↑",
                SortDirection::Desc => " ↓",
            };
            (" class=\"active\"", arrow)
        } else {
            ("", "")
        };
        let label = match field {
            SortField::Name => "Name",
            SortField::Time => "Time",
            SortField::Type => "Type",
        };
        let _ = write!(
            html,
            "<a href=\"?{}\"{class}>{label}{marker}</a>",
            html_escape(&listing_query(target, filter))
        );
    }
    html.push_str("</div>");
    html
}

fn render_entry(html: &mut String, relative: &Path, entry: &DirEntry) {
    let url = breadcrumb::entry_url(relative, &entry.raw_name, entry.is_dir());
    let (icon, icon_class, type_label, size, preview) = if entry.is_dir() {
        ("📂", "dir-icon", "Directory".to_string(), "-".to_string(), String::new())
    } else {
        let (icon, class) = filetypes::file_icon(&entry.name);
        let preview = if has_preview(&entry.name) {
            format!("<a href=\"{}?preview\">preview</a>", html_escape(&url))
        } else {
            String::new()
        };
        (
            icon,
            class,
            filetypes::type_label(&entry.name),
            filetypes::format_size(entry.size.unwrap_or(0)),
            preview,
        )
    };

    let _ = write!(
        html,
        "<li class=\"file-item\"><span class=\"file-icon {icon_class}\">{icon}</span>\
<a class=\"file-name\" href=\"{url}\">{name}{slash}</a>\
<span class=\"file-type\">{type_label}</span>\
<span class=\"file-size\">{size}</span>\
<span class=\"file-modified\">{modified}</span>\
<span class=\"file-preview\">{preview}</span></li>\n",
        url = html_escape(&url),
        name = html_escape(&entry.name),
        slash = if entry.is_dir() { "/" } else { "" },
        type_label = html_escape(&type_label),
        modified = filetypes::format_modified(entry.modified),
    );
}

/// Render a directory listing page.
pub fn render_listing(listing: &ListingPage<'_>) -> String {
    let title = listing.title();
    let crumbs = breadcrumb::breadcrumbs(listing.relative);

    let header = format!(
        "<h1>📁 {}</h1><div class=\"breadcrumb\">{}</div>",
        html_escape(listing.root_title),
        render_breadcrumbs(&crumbs)
    );

    let mut main = render_toolbar(listing.sort, listing.filter);
    main.push_str("\n<ul class=\"file-list\">\n");

    if let Some(parent) = breadcrumb::parent_url(listing.relative) {
        let _ = write!(
            main,
            "<li class=\"file-item parent-item\"><span class=\"file-icon dir-icon\">📂</span>\
<a class=\"file-name\" href=\"{}\">..</a><span class=\"file-type\">Parent</span>\
<span class=\"file-size\">-</span><span class=\"file-modified\">-</span><span></span></li>\n",
            html_escape(&parent)
        );
    }

    for entry in listing.entries {
        render_entry(&mut main, listing.relative, entry);
    }
    main.push_str("</ul>");

    if listing.entries.is_empty() {
        match listing.filter {
            Some(q) => {
                let _ = write!(
                    main,
                    "\n<p class=\"empty\">No entries match \"{}\".</p>",
                    html_escape(q)
                );
            }
            None => main.push_str("\n<p class=\"empty\">This directory is empty.</p>"),
        }
    }

    page(&format!("{title} - {}", listing.root_title), &header, &main)
}

/// Render a single-file preview page.
pub fn render_preview(preview: &PreviewPage<'_>) -> String {
    let mut header = format!(
        "<h1>📄 {}</h1><a href=\"{}\">← Back</a><a href=\"{}\">Raw</a>",
        html_escape(preview.file_name),
        html_escape(preview.back_url),
        html_escape(preview.raw_url)
    );
    match preview.markdown_view {
        Some(MarkdownView::Rendered) => {
            let _ = write!(
                header,
                "<a href=\"{}?preview=source\">Source</a>",
                html_escape(preview.raw_url)
            );
        }
        Some(MarkdownView::Source) => {
            let _ = write!(
                header,
                "<a href=\"{}?preview\">Rendered</a>",
                html_escape(preview.raw_url)
            );
        }
        None => {}
    }

    let body = match &preview.body {
        PreviewBody::Html(html) => html.clone(),
        PreviewBody::Image => format!(
            "<img class=\"image-preview\" src=\"{}\" alt=\"{}\">",
            html_escape(preview.raw_url),
            html_escape(preview.file_name)
        ),
        PreviewBody::Unavailable => format!(
            "<p class=\"empty\">Preview not available. <a href=\"{}\">Download</a></p>",
            html_escape(preview.raw_url)
        ),
    };

    page(
        preview.file_name,
        &header,
        &format!("<div class=\"preview-body\">{body}</div>"),
    )
}

/// Whether a preview link makes sense for this name.
pub fn has_preview(name: &str) -> bool {
    filetypes::preview_kind(name) != PreviewKind::Unsupported
}
