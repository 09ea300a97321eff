//! Whitespace minification for fragment markup.
//!
//! A fragment must fit on a single `data:` line, so every newline in the
//! markup has to go. This is not an HTML parser: whitespace inside `<pre>`
//! or text nodes is collapsed too.

use regex::Regex;
use std::sync::LazyLock;

static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("valid between-tags pattern"));
static LINE_EDGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s+|\s+$").expect("valid line-edges pattern"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static DOUBLE_QUOTED_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s*=\s*"([^"]*)""#).expect("valid double-quoted attribute pattern")
});
static SINGLE_QUOTED_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*=\s*'([^']*)'").expect("valid single-quoted attribute pattern")
});

pub fn minify_html(html: &str) -> String {
    let html = BETWEEN_TAGS.replace_all(html, "><");
    let html = LINE_EDGES.replace_all(&html, "");
    let html = WHITESPACE_RUN.replace_all(&html, " ");
    let html = DOUBLE_QUOTED_ATTR.replace_all(&html, r#"${1}="${2}""#);
    let html = SINGLE_QUOTED_ATTR.replace_all(&html, "${1}='${2}'");
    html.into_owned()
}
