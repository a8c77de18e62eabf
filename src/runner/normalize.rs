//! Conversion of run records into reporting documents.

use jestx_core::report::timestamp_from_millis;
use jestx_core::{LogLevel, ResultType, RunRecord, RunRecords, TestCase, TestCaseLog, TestCaseStep, TestResult, encode_uri};

const STEP_TITLE: &str = "Run jest test";

/// Normalize one record. The selector is URI-encoded for transport.
pub fn normalize_record(selector: &str, record: &RunRecord) -> TestResult {
    let start_time = timestamp_from_millis(record.start_time);
    let end_time = timestamp_from_millis(record.end_time);
    let (result_type, level) = if record.status.is_passed() {
        (ResultType::Succeed, LogLevel::Info)
    } else {
        (ResultType::Failed, LogLevel::Error)
    };

    let log = TestCaseLog {
        time: start_time,
        level,
        content: record.content.clone(),
    };
    let step = TestCaseStep {
        start_time,
        end_time,
        title: STEP_TITLE.to_string(),
        result_type,
        logs: vec![log],
    };

    TestResult {
        test: TestCase::new(encode_uri(selector)),
        start_time,
        end_time,
        result_type,
        message: record.message.clone(),
        steps: vec![step],
    }
}

/// Normalize every record, preserving record order.
pub fn normalize_records(records: &RunRecords) -> Vec<TestResult> {
    records
        .iter()
        .map(|(selector, record)| normalize_record(selector, record))
        .collect()
}
