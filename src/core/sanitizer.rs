//! Cleanup of translated text returned by providers

use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)<.*?>").expect("static tag pattern is valid"))
}

fn whitespace_pattern() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern is valid"))
}

/// One pass of the cleanup pipeline
fn clean_once(text: &str) -> String {
    let without_tags = tag_pattern().replace_all(text, "");
    let decoded = html_escape::decode_html_entities(&without_tags);
    // whitespace controls (\n, \t, \r) survive here and become spaces below
    let printable: String = decoded
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let collapsed = whitespace_pattern().replace_all(&printable, " ");
    collapsed.trim().to_string()
}

/// Strip tags, decode entities, drop control characters, collapse whitespace
/// and trim.
///
/// Decoding can surface new markup (`&lt;b&gt;` becomes `<b>`), so the pipeline
/// runs until the text stops changing. Every pass that changes the text either
/// shortens it or only rewrites whitespace, so the loop terminates.
pub fn sanitize(raw: &str) -> String {
    let mut current = clean_once(raw);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
