//! Selector filtering of discovered test cases.

use std::fs;
use std::path::Path;

/// Selector meaning "everything", bypassing substring matching.
pub const SELECT_ALL: &str = ".";

/// What a selector names on disk, relative to the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Directory,
    File,
    /// Anything else, including selectors that do not exist or cannot be inspected.
    Other,
}

/// Classify `selector` by inspecting `project_path/selector`.
///
/// A failed stat is logged and classified as [`SelectorKind::Other`].
pub fn classify_selector(project_path: &Path, selector: &str) -> SelectorKind {
    match fs::metadata(project_path.join(selector)) {
        Ok(meta) if meta.is_dir() => SelectorKind::Directory,
        Ok(meta) if meta.is_file() => SelectorKind::File,
        Ok(_) => SelectorKind::Other,
        Err(err) => {
            tracing::debug!(selector, error = %err, "selector is not a filesystem entry");
            SelectorKind::Other
        }
    }
}

/// Match one candidate against one classified selector.
///
/// A directory selector only matches as a path prefix segment (`selector/`), so a directory
/// `tests` does not match a test named `tests pass`.
pub fn selector_matches(kind: SelectorKind, selector: &str, candidate: &str) -> bool {
    match kind {
        SelectorKind::Directory => candidate.contains(&format!("{}/", selector)),
        SelectorKind::File | SelectorKind::Other => candidate.contains(selector),
    }
}

/// `true` when `selectors` request no narrowing: empty, or exactly `["."]`.
pub fn selects_all(selectors: &[String]) -> bool {
    match selectors {
        [] => true,
        [only] => only == SELECT_ALL,
        _ => false,
    }
}

/// Narrow `candidates` by `selectors`.
///
/// ## Returns
/// - `candidates` unchanged when `selectors` is empty.
/// - Otherwise the candidates (in input order) for which "some selector matches" differs from
///   `exclude`.
pub fn filter_test_cases(project_path: &Path, selectors: &[String], candidates: &[String], exclude: bool) -> Vec<String> {
    if selectors.is_empty() {
        return candidates.to_vec();
    }

    let classified: Vec<(SelectorKind, &str)> = selectors
        .iter()
        .map(|s| (classify_selector(project_path, s), s.as_str()))
        .collect();

    candidates
        .iter()
        .filter(|candidate| {
            let matched = classified
                .iter()
                .any(|(kind, selector)| selector_matches(*kind, selector, candidate));
            matched != exclude
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tests/unit")).unwrap();
        fs::write(dir.path().join("tests/unit/a.test.js"), "").unwrap();
        dir
    }

    #[test]
    fn classifies_directories_files_and_missing_paths() {
        let dir = project();
        assert_eq!(classify_selector(dir.path(), "tests"), SelectorKind::Directory);
        assert_eq!(classify_selector(dir.path(), "tests/unit/a.test.js"), SelectorKind::File);
        assert_eq!(classify_selector(dir.path(), "tests/unit/a.test.js?case"), SelectorKind::Other);
    }

    #[test]
    fn empty_selectors_keep_everything() {
        let candidates = strings(&["a?x", "b?y"]);
        assert_eq!(filter_test_cases(Path::new("."), &[], &candidates, false), candidates);
        assert_eq!(filter_test_cases(Path::new("."), &[], &candidates, true), candidates);
    }

    #[test]
    fn directory_selector_requires_trailing_slash() {
        let dir = project();
        let candidates = strings(&["tests/unit/a.test.js?adds", "other.test.js?tests pass"]);
        let kept = filter_test_cases(dir.path(), &strings(&["tests"]), &candidates, false);
        assert_eq!(kept, strings(&["tests/unit/a.test.js?adds"]));
    }

    #[test]
    fn plain_selector_matches_as_substring() {
        let candidates = strings(&["tests/utils.test.ts", "test2", "test3"]);
        let kept = filter_test_cases(Path::new("/nonexistent"), &strings(&["utils", "test2"]), &candidates, false);
        assert_eq!(kept, strings(&["tests/utils.test.ts", "test2"]));
    }

    #[test]
    fn exclude_keeps_unmatched() {
        let candidates = strings(&["a.test.js?x", "b.test.js?y"]);
        let kept = filter_test_cases(Path::new("/nonexistent"), &strings(&["a.test.js"]), &candidates, true);
        assert_eq!(kept, strings(&["b.test.js?y"]));
    }

    #[test]
    fn selects_all_only_for_empty_or_single_dot() {
        assert!(selects_all(&[]));
        assert!(selects_all(&strings(&["."])));
        assert!(!selects_all(&strings(&[".", "a"])));
        assert!(!selects_all(&strings(&["./tests"])));
    }
}
