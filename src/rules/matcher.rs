//! Rule selection
//!
//! Candidates are ordered regex, then exact, then glob; within a tier the
//! longer pattern goes first. The first candidate whose pattern matches the
//! request domain wins.

use super::types::{AuthRule, PatternKind};
use crate::domain::extract_domain;
use regex::Regex;
use tracing::{debug, warn};

/// Compiled form of a rule's pattern
#[derive(Debug)]
enum CompiledPattern {
    Regex(Regex),
    Exact,
    Glob(glob::Pattern),
}

#[derive(Debug)]
struct Candidate<'a> {
    rule: &'a AuthRule,
    pattern: CompiledPattern,
}

impl Candidate<'_> {
    fn matches(&self, domain: &str) -> bool {
        match &self.pattern {
            CompiledPattern::Regex(re) => re.is_match(domain),
            CompiledPattern::Exact => self.rule.url_pattern == domain,
            CompiledPattern::Glob(glob) => glob.matches(domain),
        }
    }
}

/// Ordered, precompiled view over a rule set
#[derive(Debug)]
pub struct RuleMatcher<'a> {
    candidates: Vec<Candidate<'a>>,
}

impl<'a> RuleMatcher<'a> {
    /// Compile and order the enabled rules.
    ///
    /// Patterns that fail to compile are logged and left out.
    pub fn new(rules: &'a [AuthRule]) -> Self {
        let mut ordered: Vec<&AuthRule> = rules.iter().filter(|rule| rule.enabled).collect();
        // Stable: equal tier and length keep declaration order
        ordered.sort_by(|a, b| {
            a.pattern_kind()
                .cmp(&b.pattern_kind())
                .then_with(|| b.url_pattern.len().cmp(&a.url_pattern.len()))
        });

        let candidates = ordered
            .into_iter()
            .filter_map(|rule| {
                compile(&rule.url_pattern).map(|pattern| Candidate { rule, pattern })
            })
            .collect();

        Self { candidates }
    }

    /// Find the rule for a URL, if any
    pub fn find(&self, url: &str) -> Option<&'a AuthRule> {
        let domain = extract_domain(url);
        if domain.is_empty() {
            return None;
        }

        let found = self
            .candidates
            .iter()
            .find(|candidate| candidate.matches(&domain))
            .map(|candidate| candidate.rule);

        match found {
            Some(rule) => debug!(
                domain = %domain,
                pattern = %rule.url_pattern,
                auth_type = rule.auth.kind(),
                "Matched auth rule"
            ),
            None => debug!(domain = %domain, "No auth rule matched"),
        }

        found
    }

    /// Number of usable candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether no rule can ever match
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Find the rule for a URL in a rule set
pub fn find_matching_rule<'a>(url: &str, rules: &'a [AuthRule]) -> Option<&'a AuthRule> {
    RuleMatcher::new(rules).find(url)
}

fn compile(pattern: &str) -> Option<CompiledPattern> {
    match PatternKind::classify(pattern) {
        PatternKind::Regex => {
            let inner = &pattern[1..];
            let inner = inner.strip_suffix('/').unwrap_or(inner);
            match Regex::new(inner) {
                Ok(re) => Some(CompiledPattern::Regex(re)),
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "Skipping rule with invalid regex");
                    None
                }
            }
        }
        PatternKind::Exact => Some(CompiledPattern::Exact),
        PatternKind::Glob => match glob::Pattern::new(pattern) {
            Ok(glob) => Some(CompiledPattern::Glob(glob)),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Skipping rule with invalid glob");
                None
            }
        },
    }
}
