use regex_syntax::{
    hir::literal::{ExtractKind, Extractor},
    parse,
};

/// Extract the prefix literals of a rule pattern for the Aho-Corasick
/// prefilter. Every match of the pattern starts with one of the returned
/// literals (lowercased, compared ASCII case-insensitively).
///
/// Returns an empty vec when no such guarantee can be given: the pattern
/// does not parse with `regex_syntax` (lookaround, backreferences), the
/// literal set is infinite, or any literal is shorter than `min_len` or
/// not plain ASCII. An empty result makes the rule an "always candidate".
pub(crate) fn extract_literals(pattern: &str, min_len: usize) -> Vec<String> {
    let hir = match parse(pattern) {
        Ok(h) => h,
        Err(_) => return Vec::new(),
    };

    let mut extractor = Extractor::new();
    extractor.kind(ExtractKind::Prefix);

    let seq = extractor.extract(&hir);
    let Some(literals) = seq.literals() else {
        return Vec::new();
    };

    // Dropping a single literal would let the prefilter skip a rule that
    // can match, so one unusable literal disqualifies the whole set.
    let mut out = Vec::with_capacity(literals.len());
    for lit in literals {
        match std::str::from_utf8(lit.as_bytes()) {
            Ok(s) if s.is_ascii() && s.len() >= min_len => out.push(s.to_ascii_lowercase()),
            _ => return Vec::new(),
        }
    }
    out.sort();
    out.dedup();
    out
}
