//! Path normalization
//!
//! Manifests hash names in Windows form, so scraped paths are brought into
//! that shape before hashing.

/// Normalize a path to Windows separators
///
/// Mixed separators are unified, repeated separators collapse, `.`
/// components are dropped and trailing separators removed. A leading
/// separator is kept, and a UNC prefix keeps both of its separators.
pub fn to_windows(path: &str) -> String {
    let is_sep = |c: char| c == '\\' || c == '/';
    let mut leading = path.chars().take_while(|&c| is_sep(c));
    let rooted = leading.next().is_some();
    let unc = leading.next().is_some() && leading.next().is_none();

    let parts: Vec<&str> = path
        .split(is_sep)
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();

    let joined = parts.join("\\");
    match (rooted, joined.is_empty()) {
        (true, false) if unc => format!("\\\\{}", joined),
        (true, _) => format!("\\{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Convert Windows separators to POSIX ones
pub fn to_posix(path: &str) -> String {
    path.replace('\\', "/")
}
