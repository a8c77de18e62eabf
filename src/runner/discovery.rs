//! Test discovery: list Jest test files, then scan their source for test declarations.
//!
//! ## Scanning
//!
//! Sources are scanned line by line without a JavaScript parser. Each line is first tokenized into
//! at most one group declaration (`describe("title", ...)`) and at most one case declaration
//! (`it(...)`/`test(...)`), then fed to a two-state machine:
//!
//! ```text
//! [NoGroup] --describe("D")--> [InGroup(D)] --describe("E")--> [InGroup(E)]
//!     ^                              |
//!     +------ top-level case --------+    (emits `path?case`)
//!
//! [InGroup(D)] --indented case--> [InGroup(D)]  (emits `path?D case`)
//! [NoGroup]    --indented case--> [NoGroup]     (emits nothing)
//! ```
//!
//! A case at column zero is always ungrouped and resets the group. An indented case seen while no
//! group is active is dropped.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use indexmap::IndexSet;
use jestx_core::Selector;
use jestx_core::selector::relative_path;
use regex::Regex;

use super::{CommandRunner, TestError, absolute_root};

/// Lists every test file Jest would run, as a JSON array of absolute paths.
pub const LIST_TESTS_COMMAND: &str = "npx jest --listTests --json";

#[allow(clippy::expect_used)]
static GROUP_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"describe\(['"](.*?)['"],"#).expect("INVARIANT: group pattern is valid"));

#[allow(clippy::expect_used)]
static TOP_LEVEL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:it|test)\(['"](.*?)['"],"#).expect("INVARIANT: case pattern is valid"));

#[allow(clippy::expect_used)]
static NESTED_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+(?:it|test)\(['"](.*?)['"],"#).expect("INVARIANT: case pattern is valid"));

/// A test case found in source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredCase {
    /// File path relative to the project root, `/`-separated.
    pub file: String,
    pub group: Option<String>,
    pub title: String,
}

impl DiscoveredCase {
    /// Full Jest test name: `"<group> <title>"`, or just the title when ungrouped.
    pub fn full_name(&self) -> String {
        match &self.group {
            Some(group) => format!("{} {}", group, self.title),
            None => self.title.clone(),
        }
    }

    pub fn selector(&self) -> String {
        Selector::new(&self.file, self.full_name()).to_string()
    }
}

/// Case declaration shapes recognized on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseDecl<'a> {
    /// Declared at column zero.
    TopLevel(&'a str),
    /// Declared after leading whitespace.
    Nested(&'a str),
}

/// Declarations found on one line. A group declaration applies before the case on the same line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LineTokens<'a> {
    group: Option<&'a str>,
    case: Option<CaseDecl<'a>>,
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn tokenize_line(line: &str) -> LineTokens<'_> {
    let group = capture(&GROUP_DECL, line);
    let case = capture(&TOP_LEVEL_CASE, line)
        .map(CaseDecl::TopLevel)
        .or_else(|| capture(&NESTED_CASE, line).map(CaseDecl::Nested));
    LineTokens { group, case }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'a> {
    NoGroup,
    InGroup(&'a str),
}

impl<'a> ScanState<'a> {
    fn enter_group(title: &'a str) -> Self {
        if title.is_empty() { ScanState::NoGroup } else { ScanState::InGroup(title) }
    }

    /// Apply a case declaration; returns the next state and the `(group, title)` to emit, if any.
    fn on_case(self, case: CaseDecl<'a>) -> (Self, Option<(Option<&'a str>, &'a str)>) {
        match (self, case) {
            (_, CaseDecl::TopLevel(title)) => (ScanState::NoGroup, Some((None, title))),
            (ScanState::InGroup(group), CaseDecl::Nested(title)) => (self, Some((Some(group), title))),
            (ScanState::NoGroup, CaseDecl::Nested(_)) => (ScanState::NoGroup, None),
        }
    }
}

/// Scan one source text for test cases.
///
/// ## Parameters
/// - `file`: project-relative path recorded on every discovered case.
/// - `source`: file contents.
pub fn scan_source(file: &str, source: &str) -> Vec<DiscoveredCase> {
    let mut state = ScanState::NoGroup;
    let mut cases = Vec::new();

    for line in source.lines() {
        let tokens = tokenize_line(line);
        if let Some(title) = tokens.group {
            state = ScanState::enter_group(title);
        }
        let Some(case) = tokens.case else {
            continue;
        };
        let (next, emitted) = state.on_case(case);
        state = next;
        if let Some((group, title)) = emitted {
            cases.push(DiscoveredCase {
                file: file.to_string(),
                group: group.map(str::to_string),
                title: title.to_string(),
            });
        }
    }

    cases
}

/// Scan test files and return the deduplicated selectors of every case found.
///
/// ## Errors
/// - [`TestError::ReadSource`] if any file cannot be read; no partial result is returned.
#[tracing::instrument(skip_all, fields(files = files.len()))]
pub fn scan_test_cases(project_path: &Path, files: &[PathBuf]) -> Result<Vec<String>, TestError> {
    let root = absolute_root(project_path);
    let mut selectors = IndexSet::new();

    for file in files {
        let absolute = root.join(file);
        let source = fs::read_to_string(&absolute).map_err(|source| TestError::ReadSource {
            path: absolute.clone(),
            source,
        })?;
        let relative = relative_path(&root, &absolute);
        selectors.extend(scan_source(&relative, &source).iter().map(DiscoveredCase::selector));
    }

    Ok(selectors.into_iter().collect())
}

/// File-level discovery: each listed file becomes a whole-file selector.
pub fn file_selectors(project_path: &Path, files: &[PathBuf]) -> Vec<String> {
    let root = absolute_root(project_path);
    let selectors: IndexSet<String> = files
        .iter()
        .map(|file| relative_path(&root, &root.join(file)))
        .collect();
    selectors.into_iter().collect()
}

/// Ask Jest for the test files of the project.
#[tracing::instrument(skip_all, fields(project = %project_path.display()))]
pub async fn list_test_files(runner: &dyn CommandRunner, project_path: &Path) -> Result<Vec<PathBuf>, TestError> {
    let output = runner.run(LIST_TESTS_COMMAND, project_path).await?;
    tracing::debug!(stdout = %output.stdout, stderr = %output.stderr, "jest --listTests finished");

    parse_test_listing(&output.stdout).map_err(|err| {
        if output.success {
            err
        } else {
            TestError::Listing(format!("{} ({}): {}", err, output.status_label(), output.stderr.trim()))
        }
    })
}

/// Extract the JSON path array from `jest --listTests --json` stdout.
///
/// Anything printed before the first `[` or after the array is ignored.
pub fn parse_test_listing(stdout: &str) -> Result<Vec<PathBuf>, TestError> {
    let start = stdout
        .find('[')
        .ok_or_else(|| TestError::Listing("no JSON array in `jest --listTests` output".to_string()))?;

    let mut stream = serde_json::Deserializer::from_str(&stdout[start..]).into_iter::<Vec<PathBuf>>();
    match stream.next() {
        Some(Ok(files)) => Ok(files),
        Some(Err(err)) => Err(TestError::Json(err)),
        None => Err(TestError::Listing("empty `jest --listTests` output".to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn selectors(file: &str, source: &str) -> Vec<String> {
        scan_source(file, source).iter().map(DiscoveredCase::selector).collect()
    }

    #[test]
    fn ungrouped_case() {
        let source = "test(\"foo\", () => {\n  expect(1).toBe(1);\n});\n";
        assert_eq!(selectors("a.test.js", source), vec!["a.test.js?foo"]);
    }

    #[test]
    fn grouped_case() {
        let source = "describe(\"D\", () => {\n  it(\"x\", () => {});\n});\n";
        assert_eq!(selectors("a.test.js", source), vec!["a.test.js?D x"]);
    }

    #[test]
    fn single_quotes_and_multiple_groups() {
        let source = "\
describe('math', () => {
  it('adds', () => {});
  test('subtracts', () => {});
});
describe('strings', () => {
  it('concats', () => {});
});
";
        assert_eq!(
            selectors("src/x.spec.ts", source),
            vec!["src/x.spec.ts?math adds", "src/x.spec.ts?math subtracts", "src/x.spec.ts?strings concats"]
        );
    }

    #[test]
    fn top_level_case_resets_group() {
        let source = "\
describe('g', () => {
  it('inner', () => {});
});
test('outer', () => {});
  it('orphan', () => {});
";
        assert_eq!(selectors("t.js", source), vec!["t.js?g inner", "t.js?outer"]);
    }

    #[test]
    fn indented_case_without_group_is_dropped() {
        // Known gap: indented cases only count once a describe block has been seen.
        let source = "  it('floating', () => {});\n";
        assert!(scan_source("t.js", source).is_empty());
    }

    #[test]
    fn empty_group_title_counts_as_no_group() {
        let source = "describe('', () => {\n  it('x', () => {});\n});\n";
        assert!(scan_source("t.js", source).is_empty());
    }

    #[test]
    fn nested_describe_replaces_group_title() {
        let source = "\
describe('outer', () => {
  describe('inner', () => {
    it('case', () => {});
  });
});
";
        assert_eq!(selectors("t.js", source), vec!["t.js?inner case"]);
    }

    #[test]
    fn group_and_case_on_one_line() {
        let source = "describe('g', () => { it('x', () => {}); });\n";
        assert_eq!(selectors("t.js", source), vec!["t.js?g x"]);
    }

    #[test]
    fn scan_test_cases_dedups_and_relativizes() {
        let dir = tempfile::tempdir().unwrap();
        let tests_dir = dir.path().join("tests");
        fs::create_dir_all(&tests_dir).unwrap();
        let file = tests_dir.join("dup.test.js");
        fs::write(&file, "test('same', () => {});\ntest('same', () => {});\n").unwrap();

        let found = scan_test_cases(dir.path(), &[file]).unwrap();
        assert_eq!(found, vec!["tests/dup.test.js?same"]);
    }

    #[test]
    fn unreadable_file_aborts_scan() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().join("ok.test.js");
        fs::write(&ok, "test('a', () => {});\n").unwrap();
        let missing = dir.path().join("missing.test.js");

        let err = scan_test_cases(dir.path(), &[ok, missing]).unwrap_err();
        assert!(matches!(err, TestError::ReadSource { .. }));
    }

    #[test]
    fn file_selectors_are_relative() {
        let root = Path::new("/work/proj");
        let files = vec![PathBuf::from("/work/proj/tests/a.test.js"), PathBuf::from("tests/b.test.js")];
        assert_eq!(file_selectors(root, &files), vec!["tests/a.test.js", "tests/b.test.js"]);
    }

    #[test]
    fn relative_root_is_resolved_before_relativizing() {
        let cwd = std::env::current_dir().unwrap();
        let files = vec![cwd.join("proj/tests/a.test.js")];
        assert_eq!(file_selectors(Path::new("proj"), &files), vec!["tests/a.test.js"]);

        let dir = tempfile::tempdir_in(".").unwrap();
        assert!(dir.path().is_relative());
        fs::create_dir_all(dir.path().join("tests")).unwrap();
        fs::write(dir.path().join("tests/a.test.js"), "test('works', () => {});\n").unwrap();
        let listed = vec![cwd.join(dir.path()).join("tests/a.test.js")];

        let found = scan_test_cases(dir.path(), &listed).unwrap();
        assert_eq!(found, vec!["tests/a.test.js?works"]);
    }

    #[test]
    fn listing_skips_leading_noise() {
        let stdout = "Determining test suites...\n[\"/p/a.test.js\",\"/p/b.test.js\"]\n";
        let files = parse_test_listing(stdout).unwrap();
        assert_eq!(files, vec![PathBuf::from("/p/a.test.js"), PathBuf::from("/p/b.test.js")]);
    }

    #[test]
    fn listing_without_array_is_an_error() {
        assert!(matches!(parse_test_listing("No tests found"), Err(TestError::Listing(_))));
    }

    #[test]
    fn malformed_listing_is_an_error() {
        assert!(matches!(parse_test_listing("[\"/p/a.test.js\""), Err(TestError::Json(_))));
    }
}
