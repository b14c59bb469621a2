//! Tests for rule matching

use super::*;
use crate::auth::AuthMethod;
use test_case::test_case;

fn bearer(pattern: &str, token: &str) -> AuthRule {
    AuthRule::new(
        pattern,
        AuthMethod::Bearer {
            token: token.to_string(),
        },
    )
}

fn token_of(rule: Option<&AuthRule>) -> Option<&str> {
    rule.map(|r| match &r.auth {
        AuthMethod::Bearer { token } => token.as_str(),
        _ => panic!("expected bearer rule"),
    })
}

fn mixed_rules() -> Vec<AuthRule> {
    vec![
        bearer("api.github.com", "exact"),
        bearer("*.openai.com", "glob"),
        bearer(r"/^api\.special\.com$/", "regex"),
        bearer("*", "wildcard"),
    ]
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test_case("/^api$/", PatternKind::Regex ; "leading slash is regex")]
#[test_case("/*/", PatternKind::Regex ; "regex wins over star")]
#[test_case("*.example.com", PatternKind::Glob ; "star is glob")]
#[test_case("*", PatternKind::Glob ; "bare star is glob")]
#[test_case("api.example.com", PatternKind::Exact ; "plain host is exact")]
#[test_case("localhost:3000", PatternKind::Exact ; "host with port is exact")]
fn test_classify(pattern: &str, expected: PatternKind) {
    assert_eq!(PatternKind::classify(pattern), expected);
}

#[test]
fn test_tier_order() {
    assert!(PatternKind::Regex < PatternKind::Exact);
    assert!(PatternKind::Exact < PatternKind::Glob);
}

// ============================================================================
// Matching Tests
// ============================================================================

#[test_case("https://api.github.com/foo", "exact" ; "exact rule")]
#[test_case("https://api.openai.com/v1", "glob" ; "glob rule")]
#[test_case("https://api.special.com", "regex" ; "regex rule")]
#[test_case("https://unknown.com", "wildcard" ; "wildcard fallback")]
fn test_mixed_rules(url: &str, expected: &str) {
    let rules = mixed_rules();
    assert_eq!(token_of(find_matching_rule(url, &rules)), Some(expected));
}

#[test]
fn test_regex_beats_exact_and_glob_regardless_of_order() {
    let exact = bearer("api.example.com", "exact");
    let glob = bearer("*.example.com", "glob");
    let regex = bearer(r"/^api\.example\.com$/", "regex");

    let orders = vec![
        vec![exact.clone(), glob.clone(), regex.clone()],
        vec![glob.clone(), regex.clone(), exact.clone()],
        vec![regex.clone(), exact.clone(), glob.clone()],
    ];

    for rules in orders {
        assert_eq!(
            token_of(find_matching_rule("https://api.example.com/x", &rules)),
            Some("regex")
        );
    }
}

#[test]
fn test_exact_beats_glob() {
    let rules = vec![
        bearer("*.example.com", "glob"),
        bearer("api.example.com", "exact"),
    ];
    assert_eq!(
        token_of(find_matching_rule("https://api.example.com", &rules)),
        Some("exact")
    );
}

#[test]
fn test_longer_glob_wins() {
    let rules = vec![
        bearer("*.com", "short"),
        bearer("*.api.example.com", "long"),
        bearer("*.example.com", "medium"),
    ];

    assert_eq!(
        token_of(find_matching_rule("https://v1.api.example.com", &rules)),
        Some("long")
    );
    assert_eq!(
        token_of(find_matching_rule("https://www.example.com", &rules)),
        Some("medium")
    );
    assert_eq!(
        token_of(find_matching_rule("https://other.com", &rules)),
        Some("short")
    );
}

#[test]
fn test_wildcard_never_shadows_specific_rule() {
    let rules = vec![bearer("*", "wildcard"), bearer("*.internal.io", "internal")];
    assert_eq!(
        token_of(find_matching_rule("https://svc.internal.io", &rules)),
        Some("internal")
    );
}

#[test]
fn test_equal_length_keeps_declaration_order() {
    let rules = vec![bearer("*.a.com", "first"), bearer("*.b.com", "second"), bearer("*.*.com", "third")];
    // "*.*.com" and "*.a.com" both match and have the same length
    assert_eq!(
        token_of(find_matching_rule("https://x.a.com", &rules)),
        Some("first")
    );
}

#[test]
fn test_exact_includes_port() {
    let rules = vec![bearer("localhost:3000", "dev")];

    assert_eq!(
        token_of(find_matching_rule("http://localhost:3000/api", &rules)),
        Some("dev")
    );
    assert!(find_matching_rule("http://localhost:4000/api", &rules).is_none());
    assert!(find_matching_rule("http://localhost/api", &rules).is_none());
}

#[test]
fn test_glob_does_not_match_bare_apex() {
    let rules = vec![bearer("*.openai.com", "glob")];
    assert!(find_matching_rule("https://openai.com", &rules).is_none());
}

#[test]
fn test_regex_partial_match_semantics() {
    // Unanchored regexes match anywhere in the domain
    let rules = vec![bearer("/github/", "gh")];
    assert_eq!(
        token_of(find_matching_rule("https://api.github.com", &rules)),
        Some("gh")
    );
}

#[test]
fn test_invalid_regex_is_skipped() {
    let rules = vec![bearer("/api[/", "broken"), bearer("*", "fallback")];
    let matcher = RuleMatcher::new(&rules);

    assert_eq!(matcher.len(), 1);
    assert_eq!(
        token_of(matcher.find("https://api.example.com")),
        Some("fallback")
    );
}

#[test]
fn test_disabled_rules_never_match() {
    let rules = vec![
        bearer("api.github.com", "exact").disabled(),
        bearer(r"/github/", "regex").disabled(),
        bearer("*", "wildcard").disabled(),
    ];

    for url in ["https://api.github.com", "https://example.com", "http://localhost:1"] {
        assert!(find_matching_rule(url, &rules).is_none());
    }
}

#[test]
fn test_disabled_rule_falls_through() {
    let rules = vec![
        bearer("api.github.com", "disabled").disabled(),
        bearer("*.github.com", "enabled"),
    ];
    assert_eq!(
        token_of(find_matching_rule("https://api.github.com", &rules)),
        Some("enabled")
    );
}

#[test]
fn test_malformed_url_matches_nothing() {
    let rules = vec![bearer("*", "wildcard")];
    assert!(find_matching_rule("not a url", &rules).is_none());
    assert!(find_matching_rule("", &rules).is_none());
}

#[test]
fn test_no_rules() {
    let rules: Vec<AuthRule> = Vec::new();
    let matcher = RuleMatcher::new(&rules);
    assert!(matcher.is_empty());
    assert!(matcher.find("https://example.com").is_none());
}

#[test]
fn test_masked_rule_keeps_metadata() {
    let rule = bearer("api.github.com", "ghp_secret").with_description("GitHub API");
    let masked = rule.masked();

    assert_eq!(masked.url_pattern, "api.github.com");
    assert_eq!(masked.description.as_deref(), Some("GitHub API"));
    assert!(masked.enabled);
    assert_eq!(token_of(Some(&masked)), Some(crate::auth::MASK));
    assert_eq!(masked.masked(), masked);
}

#[test]
fn test_rule_deserialize_defaults() {
    let rule: AuthRule = serde_json::from_str(
        r#"{"url_pattern":"api.github.com","auth":{"type":"bearer","token":"t"}}"#,
    )
    .unwrap();

    assert!(rule.enabled);
    assert!(rule.description.is_none());
    assert_eq!(rule.pattern_kind(), PatternKind::Exact);
}
