#![no_main]

use jestx::runner::discovery::{parse_test_listing, scan_source};
use jestx::runner::grouping::group_by_file;
use jestx_core::{Selector, decode_uri};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let cases = scan_source("fuzz.test.js", s);
        let selectors: Vec<String> = cases.iter().map(|case| case.selector()).collect();
        let _ = group_by_file(&selectors);

        let selector = Selector::parse(s);
        assert_eq!(Selector::parse(&selector.to_string()), selector);

        let _ = decode_uri(s);
        let _ = parse_test_listing(s);
    }
});
