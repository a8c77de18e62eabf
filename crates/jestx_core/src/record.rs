//! Run records: the parsed, pre-normalization result for one selector.
//!
//! At most one record exists per selector per execution group. The first raw entry for a selector
//! creates its record; every later entry only contributes its message text (see [`merge_record`]).

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

/// Status of a single Jest assertion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionStatus {
    Passed,
    Failed,
    Pending,
    Skipped,
    Todo,
    Disabled,
    Focused,
    #[serde(other)]
    Unknown,
}

impl AssertionStatus {
    /// Pending entries are dropped before they ever become run records.
    pub fn is_pending(self) -> bool {
        matches!(self, AssertionStatus::Pending)
    }

    pub fn is_passed(self) -> bool {
        matches!(self, AssertionStatus::Passed)
    }
}

/// Parsed outcome of one selector. Times are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub status: AssertionStatus,
    pub duration: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub message: String,
    pub content: String,
}

/// Run records keyed by encoded selector, in first-seen order.
pub type RunRecords = IndexMap<String, RunRecord>;

/// Fold a later entry for the same selector into the record that already exists.
///
/// ## Returns
/// - (`RunRecord`): `existing` with `incoming.message` appended on a new line. Status, timing and
///   content of `existing` are kept.
pub fn merge_record(mut existing: RunRecord, incoming: RunRecord) -> RunRecord {
    existing.message.push('\n');
    existing.message.push_str(&incoming.message);
    existing
}

/// Aggregate `(selector, record)` entries so each selector keeps exactly one record.
///
/// ## Notes
/// - The first entry for a selector establishes its record; later entries go through
///   [`merge_record`].
/// - Output order is the order in which selectors were first seen.
pub fn aggregate_records<I>(entries: I) -> RunRecords
where
    I: IntoIterator<Item = (String, RunRecord)>,
{
    entries.into_iter().fold(RunRecords::new(), |mut records, (selector, incoming)| {
        match records.entry(selector) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get().clone();
                slot.insert(merge_record(existing, incoming));
            }
            Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
        }
        records
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: AssertionStatus, message: &str) -> RunRecord {
        RunRecord {
            status,
            duration: 5,
            start_time: 10,
            end_time: 15,
            message: message.to_string(),
            content: message.to_string(),
        }
    }

    #[test]
    fn merge_appends_message_and_keeps_first_status() {
        let merged = merge_record(
            record(AssertionStatus::Failed, "first"),
            record(AssertionStatus::Passed, "second"),
        );
        assert_eq!(merged.status, AssertionStatus::Failed);
        assert_eq!(merged.message, "first\nsecond");
        assert_eq!(merged.content, "first");
    }

    #[test]
    fn aggregate_keeps_one_record_per_selector_in_first_seen_order() {
        let records = aggregate_records(vec![
            ("a?x".to_string(), record(AssertionStatus::Failed, "1")),
            ("b?y".to_string(), record(AssertionStatus::Passed, "")),
            ("a?x".to_string(), record(AssertionStatus::Failed, "2")),
            ("a?x".to_string(), record(AssertionStatus::Failed, "3")),
        ]);

        assert_eq!(records.len(), 2);
        let keys: Vec<_> = records.keys().cloned().collect();
        assert_eq!(keys, vec!["a?x", "b?y"]);
        assert_eq!(records["a?x"].message, "1\n2\n3");
    }

    #[test]
    fn unknown_status_deserializes() {
        let status: AssertionStatus = serde_json::from_str("\"exploded\"").unwrap();
        assert_eq!(status, AssertionStatus::Unknown);
    }
}
