use std::borrow::Cow;

/// Expand `$1`..`$9` in a version template with the capture groups of the
/// rule match, then trim trailing whitespace and dots.
///
/// Groups that did not take part in the match expand to nothing, which is
/// what lets a template such as `$1$2` pick whichever alternative matched.
/// Templates without placeholders are returned borrowed.
pub(crate) fn substitute<'a>(template: &'a str, captures: &fancy_regex::Captures<'_>) -> Cow<'a, str> {
    if !template.contains('$') {
        return Cow::Borrowed(trim_version(template));
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match after.as_bytes().first() {
            Some(d) if d.is_ascii_digit() => {
                if let Some(m) = captures.get(usize::from(d - b'0')) {
                    out.push_str(m.as_str());
                }
                rest = &after[1..];
            }
            _ => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    let len = trim_version(&out).len();
    out.truncate(len);
    Cow::Owned(out)
}

fn trim_version(s: &str) -> &str {
    s.trim_end_matches(|c: char| c.is_whitespace() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps<'a>(re: &'a fancy_regex::Regex, text: &'a str) -> fancy_regex::Captures<'a> {
        re.captures(text).unwrap().unwrap()
    }

    #[test]
    fn first_participating_alternative() {
        let re = fancy_regex::Regex::new(r"MSIE (\d+(?:\.\d+)*)|Trident/.*?rv:(\d+(?:\.\d+)*)").unwrap();

        let c = caps(&re, "compatible; MSIE 10.0; Windows NT 6.2");
        assert_eq!(substitute("$1$2", &c), "10.0");

        let c = caps(&re, "Windows NT 6.3; Trident/7.0; rv:11.0) like Gecko");
        assert_eq!(substitute("$1$2", &c), "11.0");
    }

    #[test]
    fn literal_template_is_borrowed() {
        let re = fancy_regex::Regex::new(r"(Linux)").unwrap();
        let c = caps(&re, "X11; Linux x86_64");
        assert!(matches!(substitute("1.0.", &c), Cow::Borrowed("1.0")));
    }

    #[test]
    fn trailing_dots_are_trimmed() {
        let re = fancy_regex::Regex::new(r"Firefox/([\d.]+)").unwrap();
        let c = caps(&re, "Firefox/125.");
        assert_eq!(substitute("$1", &c), "125");
    }

    #[test]
    fn dollar_without_digit_is_kept() {
        let re = fancy_regex::Regex::new(r"(\d+)").unwrap();
        let c = caps(&re, "7");
        assert_eq!(substitute("$x$1", &c), "$x7");
    }
}
