use aho_corasick::AhoCorasick;
use fancy_regex::{Captures, Regex};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::Result;
use crate::literal::extract_literals;

/// Literals shorter than this make poor prefilter keys.
const MIN_LITERAL_LEN: usize = 3;

/// Build the full case-insensitive regex string for a registry pattern.
pub(crate) fn full_pattern(pattern: &str) -> String {
    format!("(?i)(?:{})", pattern)
}

pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(&full_pattern(pattern))?)
}

/// `captures()` that treats a runtime failure (backtrack limit) as a miss.
pub(crate) fn captures<'t>(re: &Regex, ua: &'t str) -> Option<Captures<'t>> {
    match re.captures(ua) {
        Ok(caps) => caps,
        Err(err) => {
            warn!(pattern = re.as_str(), %err, "regex evaluation failed");
            None
        }
    }
}

/// `is_match()` with the same miss-on-failure policy as [`captures`].
pub(crate) fn is_match(re: &Regex, ua: &str) -> bool {
    match re.is_match(ua) {
        Ok(matched) => matched,
        Err(err) => {
            warn!(pattern = re.as_str(), %err, "regex evaluation failed");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Rule definitions
// ---------------------------------------------------------------------------

/// Uncompiled rule: primary pattern, guards and the data it writes.
pub(crate) struct RuleSpec<T> {
    pub id: String,
    pub regex: String,
    pub require: Option<String>,
    pub exclude: Option<String>,
    pub data: T,
}

/// A compiled rule. It fires when `regex` matches, `require` (if any)
/// matches and `exclude` (if any) does not.
pub(crate) struct CompiledRule<T> {
    pub id: String,
    pub regex: Regex,
    pub require: Option<Regex>,
    pub exclude: Option<Regex>,
    pub data: T,
}

impl<T> CompiledRule<T> {
    fn guards_hold(&self, ua: &str) -> bool {
        self.require.as_ref().map_or(true, |re| is_match(re, ua))
            && !self.exclude.as_ref().map_or(false, |re| is_match(re, ua))
    }
}

/// Result of a successful match.
pub(crate) struct MatchResult<'a, 't, T> {
    pub rule: &'a CompiledRule<T>,
    pub captures: Captures<'t>,
}

// ---------------------------------------------------------------------------
// Prefilter
// ---------------------------------------------------------------------------

/// Aho-Corasick automaton over the prefix literals of all rules. A rule is
/// a candidate for an input if one of its literals occurs in it, or if it
/// has no literals at all.
struct Prefilter {
    automaton: AhoCorasick,
    /// Automaton pattern index → rules owning that literal.
    owners: Vec<Vec<usize>>,
    /// Rules without usable literals.
    always: Vec<bool>,
}

impl Prefilter {
    fn build(patterns: &[String]) -> Result<Option<Self>> {
        let mut owners: IndexMap<String, Vec<usize>> = IndexMap::new();
        let mut always = vec![false; patterns.len()];

        for (idx, pattern) in patterns.iter().enumerate() {
            let literals = extract_literals(pattern, MIN_LITERAL_LEN);
            if literals.is_empty() {
                always[idx] = true;
            }
            for lit in literals {
                owners.entry(lit).or_default().push(idx);
            }
        }

        if owners.is_empty() {
            return Ok(None);
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(owners.keys())?;

        Ok(Some(Self {
            automaton,
            owners: owners.into_values().collect(),
            always,
        }))
    }

    fn candidates(&self, ua: &str) -> Vec<bool> {
        // The automaton only folds ASCII case while the rule regexes fold
        // Unicode case, so non-ASCII input skips the prefilter.
        if !ua.is_ascii() {
            return vec![true; self.always.len()];
        }
        let mut out = self.always.clone();
        for m in self.automaton.find_overlapping_iter(ua) {
            for &rule in &self.owners[m.pattern().as_usize()] {
                out[rule] = true;
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// CompiledParser: ordered, first-match-wins rule list
// ---------------------------------------------------------------------------

pub(crate) struct CompiledParser<T> {
    rules: Vec<CompiledRule<T>>,
    prefilter: Option<Prefilter>,
}

impl<T> CompiledParser<T> {
    /// Compile rules in parallel; evaluation order is the iteration order
    /// of `specs`.
    pub fn build(category: &'static str, specs: Vec<RuleSpec<T>>) -> Result<Self>
    where
        T: Send,
    {
        let patterns: Vec<String> = specs.iter().map(|s| s.regex.clone()).collect();

        let rules: Vec<CompiledRule<T>> = specs
            .into_par_iter()
            .map(|spec| -> Result<_> {
                Ok(CompiledRule {
                    regex: compile_regex(&spec.regex)?,
                    require: spec.require.as_deref().map(compile_regex).transpose()?,
                    exclude: spec.exclude.as_deref().map(compile_regex).transpose()?,
                    id: spec.id,
                    data: spec.data,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let prefilter = Prefilter::build(&patterns)?;

        debug!(
            category,
            rules = rules.len(),
            always_candidates = prefilter
                .as_ref()
                .map_or(rules.len(), |p| p.always.iter().filter(|a| **a).count()),
            "compiled rule set"
        );

        Ok(Self { rules, prefilter })
    }

    /// Rule ids in evaluation order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.id.as_str())
    }

    /// Find the first rule (in order) that fires for `ua`.
    pub fn match_first<'a, 't>(&'a self, ua: &'t str) -> Option<MatchResult<'a, 't, T>> {
        let candidates = self.prefilter.as_ref().map(|p| p.candidates(ua));

        self.rules.iter().enumerate().find_map(|(idx, rule)| {
            if candidates.as_ref().is_some_and(|c| !c[idx]) {
                return None;
            }
            let caps = captures(&rule.regex, ua)?;
            if !rule.guards_hold(ua) {
                return None;
            }
            Some(MatchResult {
                rule,
                captures: caps,
            })
        })
    }
}
