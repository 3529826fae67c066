//! POSIX-style path helpers for workspace-relative paths.
//!
//! Tree paths always use forward slashes regardless of host platform, so
//! these never go through `std::path`.

/// Normalize a path: backslashes become `/`, `.` segments are dropped,
/// `..` pops the previous segment, and repeated separators collapse.
///
/// A leading `/` is preserved. Leading `..` segments of a relative path are
/// kept. An empty result is returned as an empty string.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Join path fragments and normalize the result.
///
/// Empty fragments are skipped, so `join_path_fragments(&["", "index.ts"])`
/// is `index.ts`.
pub fn join_path_fragments(fragments: &[&str]) -> String {
    let joined = fragments
        .iter()
        .filter(|f| !f.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    normalize_path(&joined)
}

/// Directory portion of a path (`""` for a bare file name).
pub fn dirname(path: &str) -> String {
    let normalized = normalize_path(path);
    match normalized.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}

/// Final segment of a path.
pub fn basename(path: &str) -> String {
    let normalized = normalize_path(path);
    match normalized.rfind('/') {
        Some(idx) => normalized[idx + 1..].to_string(),
        None => normalized,
    }
}

/// Relative path from directory `from` to path `to`.
///
/// Both are treated as workspace-relative. Returns `""` when they are equal.
pub fn relative(from: &str, to: &str) -> String {
    let from = normalize_path(from);
    let to = normalize_path(to);

    let from_segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segments: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_segments
        .iter()
        .zip(to_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat("..").take(from_segments.len() - common));
    parts.extend(&to_segments[common..]);
    parts.join("/")
}

/// Whether `path` equals `dir` or sits underneath it. An empty `dir` is the
/// workspace root and contains everything.
pub fn is_within(path: &str, dir: &str) -> bool {
    let path = normalize_path(path);
    let dir = normalize_path(dir);
    dir.is_empty() || path == dir || path.starts_with(&format!("{}/", dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dots_and_backslashes() {
        assert_eq!(normalize_path("libs\\ui//src/./lib/../index.ts"), "libs/ui/src/index.ts");
        assert_eq!(normalize_path("./libs/ui/"), "libs/ui");
        assert_eq!(normalize_path("../shared/x"), "../shared/x");
        assert_eq!(normalize_path("/abs/../root"), "/root");
        assert_eq!(normalize_path("."), "");
    }

    #[test]
    fn join_skips_empty_fragments() {
        assert_eq!(join_path_fragments(&["", "index.ts"]), "index.ts");
        assert_eq!(join_path_fragments(&["libs/ui/src", "index.ts"]), "libs/ui/src/index.ts");
        assert_eq!(join_path_fragments(&["libs/ui/src/", "/lib", "button"]), "libs/ui/src/lib/button");
    }

    #[test]
    fn dirname_and_basename() {
        assert_eq!(dirname("libs/ui/src/index.ts"), "libs/ui/src");
        assert_eq!(dirname("index.ts"), "");
        assert_eq!(basename("libs/ui/src/index.ts"), "index.ts");
        assert_eq!(basename("index.ts"), "index.ts");
    }

    #[test]
    fn relative_walks_up_and_down() {
        assert_eq!(relative("libs/ui/src", "libs/ui/src/lib/button"), "lib/button");
        assert_eq!(relative("libs/ui/src", "libs/ui/components"), "../components");
        assert_eq!(relative("libs/ui/src", "libs/ui/src"), "");
        assert_eq!(relative("", "libs/ui"), "libs/ui");
    }

    #[test]
    fn is_within_matches_whole_segments() {
        assert!(is_within("libs/ui/src", "libs/ui"));
        assert!(is_within("libs/ui", "libs/ui"));
        assert!(!is_within("libs/ui-kit/src", "libs/ui"));
        assert!(is_within("anything", ""));
    }
}
