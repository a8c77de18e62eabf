//! Transport encoding for selectors.
//!
//! Selectors travel to and from the reporting platform URI-encoded: reserved URI characters
//! (`/`, `?`, `&`, ...) stay literal, everything else outside the unreserved set is
//! percent-encoded as UTF-8.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left untouched when encoding a full URI.
const URI_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Percent-encode a selector for transport, keeping URI-reserved characters literal.
pub fn encode_uri(input: &str) -> String {
    utf8_percent_encode(input, URI_SET).to_string()
}

/// Decode percent-escapes in a transported test name.
///
/// ## Notes
/// - Malformed escapes (a `%` not followed by two hex digits) are kept literally, so names such
///   as `"reaches 100% coverage"` survive.
/// - If decoding would produce invalid UTF-8 the input is returned unchanged.
pub fn decode_uri(input: &str) -> Cow<'_, str> {
    match percent_decode_str(input).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(input),
    }
}
