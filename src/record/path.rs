use crate::document::MARKER_FILE;

/// Map a document key to its canonical store key.
///
/// The result always starts with `/`, never ends with `/` (except for the
/// root itself) and never ends with the marker file name. Applying it twice
/// gives the same result as applying it once.
pub fn canonicalize(path: &str) -> String {
    let mut rest = path;
    loop {
        let trimmed = rest.trim_end_matches('/');
        match trimmed.strip_suffix(MARKER_FILE) {
            Some(dir) if dir.is_empty() || dir.ends_with('/') => rest = dir,
            _ => {
                rest = trimmed;
                break;
            }
        }
    }

    if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{rest}")
    }
}

/// `key` with its last segment removed.
pub fn parent_path(key: &str) -> &str {
    key.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// `key` with its last two segments removed.
pub fn grandparent_path(key: &str) -> &str {
    parent_path(parent_path(key))
}
