//! Selector encoding: `<relativeFilePath>?<testName>`.
//!
//! A selector addresses one test case, or a whole file when the name is empty. Once encoded,
//! selectors are compared as plain strings (equality or substring containment); the parsed form
//! exists only to split a selector back into its file and name.

use std::fmt;
use std::path::Path;

/// Separator between the file path and the test name.
pub const SELECTOR_SEPARATOR: char = '?';

/// A test selector split into its file path and test name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector {
    path: String,
    name: String,
}

impl Selector {
    /// Build a selector from a file path and a test name.
    ///
    /// Backslashes in `path` are normalized to forward slashes.
    pub fn new(path: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            path: normalize_separators(path.as_ref()),
            name: name.into(),
        }
    }

    /// Build a selector addressing every test in `path`.
    pub fn whole_file(path: impl AsRef<str>) -> Self {
        Self::new(path, String::new())
    }

    /// Split an encoded selector on its first `?`.
    ///
    /// ## Notes
    /// - Input without a `?` is a whole-file selector.
    /// - Only the first `?` separates; later ones belong to the test name.
    /// - Both parts are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let (path, name) = raw.split_once(SELECTOR_SEPARATOR).unwrap_or((raw, ""));
        Self {
            path: path.to_string(),
            name: name.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` when the selector names no test and therefore addresses the whole file.
    pub fn is_whole_file(&self) -> bool {
        self.name.is_empty()
    }

    pub fn into_parts(self) -> (String, String) {
        (self.path, self.name)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}{}{}", self.path, SELECTOR_SEPARATOR, self.name)
        }
    }
}

/// Replace platform path separators with `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Express `file` relative to `root` with forward slashes.
///
/// ## Notes
/// - Purely lexical: nothing is resolved on disk.
/// - A `file` outside `root` is returned unchanged (separators still normalized).
pub fn relative_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    normalize_separators(&relative.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_first_separator() {
        let selector = Selector::parse("tests/a.test.ts?does it work? yes");
        assert_eq!(selector.path(), "tests/a.test.ts");
        assert_eq!(selector.name(), "does it work? yes");
    }

    #[test]
    fn parse_without_separator_is_whole_file() {
        let selector = Selector::parse("tests/a.test.ts");
        assert!(selector.is_whole_file());
        assert_eq!(selector.to_string(), "tests/a.test.ts");
    }

    #[test]
    fn trailing_separator_yields_empty_name() {
        let selector = Selector::parse("tests/a.test.ts?");
        assert_eq!(selector.path(), "tests/a.test.ts");
        assert_eq!(selector.name(), "");
    }

    #[test]
    fn path_separators_are_normalized() {
        let selector = Selector::new("tests\\unit\\a.test.ts", "case");
        assert_eq!(selector.to_string(), "tests/unit/a.test.ts?case");
    }

    #[test]
    fn relative_path_strips_root() {
        let rel = relative_path(Path::new("/work/proj"), Path::new("/work/proj/src/a.test.js"));
        assert_eq!(rel, "src/a.test.js");
    }

    #[test]
    fn relative_path_outside_root_is_unchanged() {
        let rel = relative_path(Path::new("/work/proj"), Path::new("/elsewhere/a.test.js"));
        assert_eq!(rel, "/elsewhere/a.test.js");
    }

    proptest::proptest! {
        #[test]
        fn display_then_parse_is_stable(path in "[a-z/.\\-]{0,12}", name in "[a-z ?|]{0,8}") {
            let selector = Selector::new(&path, name.clone());
            let reparsed = Selector::parse(&selector.to_string());
            proptest::prop_assert_eq!(reparsed.path(), selector.path());
            proptest::prop_assert_eq!(reparsed.name(), name.as_str());
        }
    }
}
