use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Flavor names become map keys, so stray spacing would split one flavor in two.
pub fn sanitize(input: &str) -> String {
    WHITESPACE.replace_all(input.trim(), " ").into_owned()
}
