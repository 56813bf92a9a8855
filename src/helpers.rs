use crate::substitution::substitute;

/// Inputs are only matched up to this many bytes. Real User-Agent strings
/// stay well below it.
pub(crate) const MAX_INPUT_LENGTH: usize = 512;

/// Cut `ua` to at most [`MAX_INPUT_LENGTH`] bytes on a char boundary.
pub(crate) fn clamp_input(ua: &str) -> &str {
    if ua.len() <= MAX_INPUT_LENGTH {
        return ua;
    }
    let mut end = MAX_INPUT_LENGTH;
    while !ua.is_char_boundary(end) {
        end -= 1;
    }
    &ua[..end]
}

/// Version tokens such as `17_0_3` use underscores; output is dotted.
pub(crate) fn normalize_version(version: &str) -> String {
    version.replace('_', ".")
}

/// Resolve a rule's version from its template, or capture group 1 when
/// the rule has none. `None` when the resolved version is empty.
pub(crate) fn extract_version(
    template: Option<&str>,
    captures: &fancy_regex::Captures<'_>,
) -> Option<String> {
    let raw = match template {
        Some(tpl) => substitute(tpl, captures),
        None => capture_or_empty(captures, 1).into(),
    };
    if raw.is_empty() {
        None
    } else {
        Some(normalize_version(&raw))
    }
}

pub(crate) fn capture_or_empty<'t>(captures: &fancy_regex::Captures<'t>, group: usize) -> &'t str {
    captures.get(group).map(|m| m.as_str()).unwrap_or("")
}
