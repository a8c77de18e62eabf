//! Provide the shared, pure vocabulary of the jestx pipeline.
//!
//! Everything in this crate is a value type or a deterministic helper. The pipeline crate (`jestx`)
//! threads these values from discovery through execution to the reporting boundary.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, no process or filesystem access.
//! - Current scope: selector encoding (`path?name`), transport percent-encoding, run records and
//!   their merge rule, the normalized reporting model, the input descriptor, and the coverage
//!   descriptor.

pub mod coverage;
pub mod encoding;
pub mod param;
pub mod record;
pub mod report;
pub mod selector;

pub use coverage::CoverageDescriptor;
pub use encoding::{decode_uri, encode_uri};
pub use param::EntryParam;
pub use record::{AssertionStatus, RunRecord, RunRecords, aggregate_records, merge_record};
pub use report::{LoadError, LoadResult, LogLevel, ResultType, TestCase, TestCaseLog, TestCaseStep, TestResult};
pub use selector::{SELECTOR_SEPARATOR, Selector};
