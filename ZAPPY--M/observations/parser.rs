use crate::plan::{Action, Plan};

const COMMENT_MARKERS: &[char] = &[';', '#'];

/// Parses raw plan text into an ordered [`Plan`].
///
/// Accepts concatenated actions (`(a)(b)(c)`), one action per line, or a mix
/// of both. Every `)(` adjacency is a hard split point, as is every line break
/// (`\n`, `\r\n` or a lone `\r`).
/// Fragments are trimmed; empty fragments and comment lines (`;` or `#`) are
/// dropped. A fragment that lost its outer `(` or `)` gets exactly one back.
#[must_use]
pub fn parse_plan(content: &str) -> Plan {
    let content = content.trim();
    if content.is_empty() {
        return Plan::default();
    }
    content
        .replace(")(", ")\n(")
        .split(&['\n', '\r'][..])
        .filter_map(parse_fragment)
        .collect()
}

fn parse_fragment(fragment: &str) -> Option<Action> {
    let fragment = fragment.trim();
    if fragment.is_empty() || fragment.starts_with(COMMENT_MARKERS) {
        return None;
    }
    let mut token = String::with_capacity(fragment.len() + 2);
    if !fragment.starts_with('(') {
        token.push('(');
    }
    token.push_str(fragment);
    if !fragment.ends_with(')') {
        token.push(')');
    }
    Some(Action::new(token))
}
