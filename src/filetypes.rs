//! Static extension lookups used for presentation: icons, type labels,
//! preview kinds. Everything here is a pure function of the file name.

use std::path::Path;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Text,
    Markdown,
    Image,
    Unsupported,
}

#[derive(Debug, Clone, Copy)]
struct Descriptor {
    label: &'static str,
    icon: &'static str,
    icon_class: &'static str,
    preview: PreviewKind,
}

const fn code(label: &'static str, icon: &'static str) -> Descriptor {
    Descriptor {
        label,
        icon,
        icon_class: "file-icon-code",
        preview: PreviewKind::Text,
    }
}

const fn doc(label: &'static str, icon: &'static str, preview: PreviewKind) -> Descriptor {
    Descriptor {
        label,
        icon,
        icon_class: "file-icon-doc",
        preview,
    }
}

const IMAGE: Descriptor = Descriptor {
    label: "Image",
    icon: "🖼️",
    icon_class: "file-icon-img",
    preview: PreviewKind::Image,
};

const ARCHIVE: Descriptor = Descriptor {
    label: "Archive",
    icon: "📦",
    icon_class: "",
    preview: PreviewKind::Unsupported,
};

static DESCRIPTORS: &[(&str, Descriptor)] = &[
    ("py", code("Python", "🐍")),
    ("js", code("JavaScript", "📜")),
    ("ts", code("TypeScript", "📜")),
    ("rs", code("Rust", "🦀")),
    ("json", code("JSON", "📋")),
    ("html", code("HTML", "🌐")),
    ("css", code("CSS", "🎨")),
    ("xml", code("XML", "📋")),
    ("yaml", code("YAML", "📋")),
    ("yml", code("YAML", "📋")),
    ("toml", code("TOML", "📋")),
    ("sh", code("Shell", "⚡")),
    ("ini", code("Config", "⚙️")),
    ("cfg", code("Config", "⚙️")),
    ("conf", code("Config", "⚙️")),
    ("md", doc("Markdown", "📝", PreviewKind::Markdown)),
    ("markdown", doc("Markdown", "📝", PreviewKind::Markdown)),
    ("txt", doc("Text", "📄", PreviewKind::Text)),
    ("log", doc("Log", "📄", PreviewKind::Text)),
    ("csv", doc("CSV", "📄", PreviewKind::Text)),
    ("pdf", doc("PDF", "📕", PreviewKind::Unsupported)),
    ("png", IMAGE),
    ("jpg", IMAGE),
    ("jpeg", IMAGE),
    ("gif", IMAGE),
    ("svg", IMAGE),
    ("webp", IMAGE),
    ("zip", ARCHIVE),
    ("tar", ARCHIVE),
    ("gz", ARCHIVE),
];

/// Lowercased extension of `name`; dotfiles like `.profile` have none.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn lookup(name: &str) -> Option<&'static Descriptor> {
    let ext = extension_of(name);
    DESCRIPTORS
        .iter()
        .find(|(key, _)| *key == ext)
        .map(|(_, descriptor)| descriptor)
}

/// Icon glyph and CSS class for a file name.
pub fn file_icon(name: &str) -> (&'static str, &'static str) {
    lookup(name)
        .map(|d| (d.icon, d.icon_class))
        .unwrap_or(("📄", ""))
}

/// Human type label; unknown extensions are shown upper-cased, files
/// without one as `File`.
pub fn type_label(name: &str) -> String {
    if let Some(descriptor) = lookup(name) {
        return descriptor.label.to_string();
    }
    let ext = extension_of(name);
    if ext.is_empty() {
        "File".to_string()
    } else {
        ext.to_uppercase()
    }
}

pub fn preview_kind(name: &str) -> PreviewKind {
    lookup(name)
        .map(|d| d.preview)
        .unwrap_or(PreviewKind::Unsupported)
}

pub fn format_size(size: u64) -> String {
    let mut size = size as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}

/// Local `YYYY-MM-DD HH:MM` for a Unix timestamp.
pub fn format_modified(secs: Option<u64>) -> String {
    secs.and_then(|s| DateTime::from_timestamp(i64::try_from(s).ok()?, 0))
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_label() {
        assert_eq!(type_label("main.py"), "Python");
        assert_eq!(type_label("README.MD"), "Markdown");
        assert_eq!(type_label("photo.jpeg"), "Image");
        assert_eq!(type_label("data.parquet"), "PARQUET");
        assert_eq!(type_label("Makefile"), "File");
    }

    #[test]
    fn test_dotfiles_have_no_extension() {
        assert_eq!(extension_of(".profile"), "");
        assert_eq!(extension_of("archive.tar.GZ"), "gz");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(type_label(".profile"), "File");
        assert_eq!(type_label(".env.json"), "JSON");
    }

    #[test]
    fn test_file_icon() {
        assert_eq!(file_icon("run.sh"), ("⚡", "file-icon-code"));
        assert_eq!(file_icon("notes.txt"), ("📄", "file-icon-doc"));
        assert_eq!(file_icon("blob.xyz"), ("📄", ""));
    }

    #[test]
    fn test_preview_kind() {
        assert_eq!(preview_kind("a.md"), PreviewKind::Markdown);
        assert_eq!(preview_kind("a.rs"), PreviewKind::Text);
        assert_eq!(preview_kind("a.PNG"), PreviewKind::Image);
        assert_eq!(preview_kind("a.pdf"), PreviewKind::Unsupported);
        assert_eq!(preview_kind("noext"), PreviewKind::Unsupported);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(1023), "1023.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024u64.pow(4)), "3.0 TB");
    }

    #[test]
    fn test_format_modified_missing() {
        assert_eq!(format_modified(None), "-");
        assert_eq!(format_modified(Some(0)).len(), "1970-01-01 00:00".len());
    }
}
