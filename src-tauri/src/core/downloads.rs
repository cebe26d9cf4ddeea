//! Download naming
//!
//! Picks a safe file name from the download URL and a destination that does
//! not overwrite anything already in the folder.

use std::path::{Path, PathBuf};

use url::Url;

const FALLBACK_NAME: &str = "download";
const MAX_NAME_LEN: usize = 200;

/// File name suggested by the URL's last path segment.
pub fn suggested_file_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let decoded = urlencoding::decode(segment)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    sanitize_file_name(&decoded)
}

/// Replace path separators and control characters; never returns an empty name.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.').trim();
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}

/// `dir/name`, or `dir/stem (n).ext` for the first `n` that is free.
pub fn unique_destination(dir: &Path, name: &str, exists: impl Fn(&Path) -> bool) -> PathBuf {
    let candidate = dir.join(name);
    if !exists(&candidate) {
        return candidate;
    }

    let (stem, extension) = split_extension(name);
    (1u32..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|path| !exists(path))
        .unwrap_or(candidate)
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(index) if index > 0 && index + 1 < name.len() => (&name[..index], Some(&name[index + 1..])),
        _ => (name, None),
    }
}
