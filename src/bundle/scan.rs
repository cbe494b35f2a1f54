//! Pattern scanners locating the references rewritten during packing.
//!
//! These are deliberately narrow: a `require` call with one string literal, an
//! `@import` at-rule with one quoted string, and a `url(...)` token. No attempt
//! is made to understand comments or string contexts around them.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::PackResult;

/// A reference found in module source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Byte offset where the replaced text starts.
    pub start: usize,
    /// Byte offset just past the replaced text.
    pub end: usize,
    /// Referenced specifier without quotes.
    pub value: &'a str,
    /// Quote character used around the specifier, if any.
    pub quote: Option<char>,
}

fn require_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\brequire[ \t]*\([ \t]*(?:"([^"\\\n]*)"|'([^'\\\n]*)')[ \t]*\)"#)
            .expect("invalid require regex")
    })
}

fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"@import\s+(?:"([^"]*)"|'([^']*)')\s*;\s*"#).expect("invalid @import regex")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^"'()\s]+))\s*\)"#)
            .expect("invalid url regex")
    })
}

fn reference_from<'a>(caps: &Captures<'a>) -> Option<Reference<'a>> {
    let whole = caps.get(0)?;
    let (value, quote) = if let Some(m) = caps.get(1) {
        (m.as_str(), Some('"'))
    } else if let Some(m) = caps.get(2) {
        (m.as_str(), Some('\''))
    } else {
        (caps.get(3)?.as_str(), None)
    };
    Some(Reference {
        start: whole.start(),
        end: whole.end(),
        value,
        quote,
    })
}

/// `require("...")` calls, skipping member calls such as `loader.require(...)`.
///
/// A call never spans lines, so rewriting it keeps the line layout intact.
pub fn require_calls(src: &str) -> Vec<Reference<'_>> {
    require_pattern()
        .captures_iter(src)
        .filter_map(|caps| reference_from(&caps))
        .filter(|reference| {
            !src[..reference.start]
                .chars()
                .next_back()
                .is_some_and(|c| c == '.' || c == '$')
        })
        .collect()
}

/// `@import "...";` statements, each spanning the whitespace that follows it.
pub fn import_statements(src: &str) -> Vec<Reference<'_>> {
    import_pattern()
        .captures_iter(src)
        .filter_map(|caps| reference_from(&caps))
        .collect()
}

/// `url(...)` tokens with quoted or bare arguments.
pub fn url_references(src: &str) -> Vec<Reference<'_>> {
    url_pattern()
        .captures_iter(src)
        .filter_map(|caps| reference_from(&caps))
        .collect()
}

/// Rebuild `src`, replacing each reference by the text `replace` returns.
///
/// `None` keeps the original text of that reference.
pub fn replace_references<'a, F>(
    src: &'a str,
    references: &[Reference<'a>],
    mut replace: F,
) -> PackResult<String>
where
    F: FnMut(&Reference<'a>) -> PackResult<Option<String>>,
{
    let mut output = String::with_capacity(src.len());
    let mut last = 0;
    for reference in references {
        output.push_str(&src[last..reference.start]);
        match replace(reference)? {
            Some(replacement) => output.push_str(&replacement),
            None => output.push_str(&src[reference.start..reference.end]),
        }
        last = reference.end;
    }
    output.push_str(&src[last..]);
    Ok(output)
}
