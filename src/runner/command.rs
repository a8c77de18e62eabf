//! Jest command construction for one file group.

use jestx_core::decode_uri;

use crate::config::Config;

/// Base invocation of the Jest CLI.
pub const JEST_COMMAND: &str = "npx jest";
/// Alternation operator of `--testNamePattern`'s regular expression.
const NAME_ALTERNATION: &str = "|";

/// A shell command line plus the selectors it is expected to produce results for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltCommand {
    pub command: String,
    /// `path?name` per requested name, in input order. Empty when no names were given.
    pub test_identifiers: Vec<String>,
}

/// Name of the JSON report for a file group: `/` becomes `_`, plus `.json`.
pub fn output_file_name(path: &str) -> String {
    format!("{}.json", path.replace('/', "_"))
}

/// Quote `value` for use inside a double-quoted shell word.
fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Builds Jest invocations from the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    config: &'a Config,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the command running `test_names` from `path`, writing JSON results to `output_file`.
    ///
    /// ## Notes
    /// - The path, the name pattern and the output file are double-quoted with shell metacharacters escaped.
    /// - Names are OR-ed into one `--testNamePattern` after percent-decoding.
    /// - An empty pattern (no names, or only empty names) runs the whole file.
    /// - Output is always `--json --outputFile="<output_file>" --color=false`, followed by the
    ///   configured extra arguments and, with coverage enabled, `--collect-coverage`.
    pub fn build(&self, path: &str, test_names: &[String], output_file: &str) -> BuiltCommand {
        let mut parts = vec![JEST_COMMAND.to_string(), format!("\"{}\"", escape_double_quoted(path))];

        let pattern = decode_uri(&test_names.join(NAME_ALTERNATION)).into_owned();
        if !pattern.is_empty() {
            parts.push(format!("--testNamePattern=\"{}\"", escape_double_quoted(&pattern)));
        }

        parts.push("--json".to_string());
        parts.push(format!("--outputFile=\"{}\"", escape_double_quoted(output_file)));
        parts.push("--color=false".to_string());

        let extra_args = self.config.extra_args.trim();
        if !extra_args.is_empty() {
            parts.push(extra_args.to_string());
        }
        if self.config.coverage {
            parts.push("--collect-coverage".to_string());
        }

        let test_identifiers = test_names.iter().map(|name| format!("{}?{}", path, name)).collect();

        BuiltCommand {
            command: parts.join(" "),
            test_identifiers,
        }
    }
}
