//! Turning editor code into a single line for the Tinker prompt
//!
//! This is a textual pass, not a PHP parser. Comment leaders and tag-like
//! text inside string literals are stripped along with real comments; a
//! snippet such as `echo "a // b";` loses everything after `//`.

use std::sync::LazyLock;

use regex::Regex;

static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<\?php|<\?=|<\?"));
static CLOSE_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"\?>"));
static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)/\*.*?\*/"));
static SLASH_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)//.*$"));
static HASH_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)#.*$"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));
static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| compile(r">\s+<"));

fn compile(pattern: &str) -> Regex {
    // Only called with the literal patterns above
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Strip PHP tags and comments and fold the code onto one line.
pub fn minify_php(source: &str) -> String {
    let code = OPEN_TAG.replace_all(source, "");
    let code = CLOSE_TAG.replace_all(&code, "");

    // Block comments go first so a `//` inside `/* ... */` cannot cut the
    // comment's terminator off.
    let code = BLOCK_COMMENT.replace_all(&code, "");
    let code = SLASH_COMMENT.replace_all(&code, "");
    let code = HASH_COMMENT.replace_all(&code, "");

    let code = WHITESPACE.replace_all(&code, " ");
    let code = BETWEEN_TAGS.replace_all(&code, "><");

    code.trim().to_string()
}
