//! Partition selectors by source file, the unit of execution.

use indexmap::IndexMap;
use jestx_core::Selector;

/// Test names per file, in first-seen file order. An empty name means "no name filter".
pub type ExecutionGroups = IndexMap<String, Vec<String>>;

/// Group selectors by file path.
///
/// Names keep input order and duplicates are preserved: each is a separate filter term.
pub fn group_by_file<S: AsRef<str>>(selectors: &[S]) -> ExecutionGroups {
    let mut groups = ExecutionGroups::new();
    for selector in selectors {
        let (path, name) = Selector::parse(selector.as_ref()).into_parts();
        groups.entry(path).or_default().push(name);
    }
    tracing::debug!(?groups, "grouped selectors by file");
    groups
}
