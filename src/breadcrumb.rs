use std::ffi::OsStr;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub url: String,
}

/// Percent-encode one path segment from its raw on-disk bytes.
pub fn encode_segment(segment: &OsStr) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        urlencoding::encode_binary(segment.as_bytes()).into_owned()
    }
    #[cfg(not(unix))]
    {
        urlencoding::encode(&segment.to_string_lossy()).into_owned()
    }
}

/// URL of a root-relative directory, always with a trailing slash.
pub fn directory_url(relative: &Path) -> String {
    let mut url = String::from("/");
    for segment in relative.iter() {
        url.push_str(&encode_segment(segment));
        url.push('/');
    }
    url
}

/// URL of `name` inside the directory at `relative`.
pub fn entry_url(relative: &Path, name: &OsStr, is_dir: bool) -> String {
    let mut url = directory_url(relative);
    url.push_str(&encode_segment(name));
    if is_dir {
        url.push('/');
    }
    url
}

/// One crumb per segment of `relative`, each linking to that ancestor.
/// The workspace root itself has no crumbs.
pub fn breadcrumbs(relative: &Path) -> Vec<Breadcrumb> {
    let mut url = String::from("/");
    relative
        .iter()
        .map(|segment| {
            url.push_str(&encode_segment(segment));
            url.push('/');
            Breadcrumb {
                label: segment.to_string_lossy().to_string(),
                url: url.clone(),
            }
        })
        .collect()
}

/// Link to the containing directory, `None` at the workspace root.
pub fn parent_url(relative: &Path) -> Option<String> {
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(directory_url(relative.parent().unwrap_or(Path::new(""))))
}
