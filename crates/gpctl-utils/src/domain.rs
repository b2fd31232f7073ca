//! Canonical comparison keys for hostnames
//!
//! Users type domains in many shapes (`https://www.Example.com:8080/wp-admin`,
//! `example.com`, ` www.example.com `). Bindings and site lookups compare the
//! sanitized form.

use tracing::info;

use crate::error::DomainError;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Reduce `raw` to its canonical host form.
///
/// Steps, repeated until nothing changes: trim, strip a leading `http://` or
/// `https://`, strip a leading `www.`, cut at the first `/`, strip a trailing
/// `:<port>`, trim. Case is preserved. The result is then validated as
/// `label(.label)*` with alphanumeric labels and internal hyphens only.
///
/// When the result differs from the input an info event is logged.
pub fn sanitize_domain(raw: &str) -> Result<String, DomainError> {
    let current = strip_to_host(raw);
    validate(raw, &current)?;

    if current != raw {
        info!(original = raw, sanitized = %current, "Normalized domain");
    }
    Ok(current)
}

/// Whether `candidate` names the same host as the already-sanitized `domain`.
///
/// Used to match API listings, so nothing is logged or validated and the
/// comparison ignores ASCII case.
#[must_use]
pub fn matches_domain(candidate: &str, domain: &str) -> bool {
    strip_to_host(candidate).eq_ignore_ascii_case(domain)
}

fn strip_to_host(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = sanitize_step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_step(input: &str) -> String {
    let mut s = input.trim();
    s = strip_prefix_ignore_case(s, "https://")
        .or_else(|| strip_prefix_ignore_case(s, "http://"))
        .unwrap_or(s);
    s = strip_prefix_ignore_case(s, "www.").unwrap_or(s);
    if let Some(slash) = s.find('/') {
        s = &s[..slash];
    }
    if let Some(colon) = s.rfind(':') {
        let port = &s[colon + 1..];
        if port.chars().all(|c| c.is_ascii_digit()) {
            s = &s[..colon];
        }
    }
    s.trim().to_string()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn validate(raw: &str, candidate: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidDomain {
        input: raw.to_string(),
        reason: reason.to_string(),
    };

    if candidate.is_empty() {
        return Err(invalid("domain is empty"));
    }
    if candidate.len() > MAX_DOMAIN_LEN {
        return Err(invalid("domain is longer than 253 characters"));
    }

    for label in candidate.split('.') {
        if label.is_empty() {
            return Err(invalid("domain has an empty label"));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(invalid("a label is longer than 63 characters"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("only letters, digits, '-' and '.' are allowed"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("labels cannot start or end with '-'"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_url_is_reduced_to_host() {
        assert_eq!(
            sanitize_domain("https://www.Example.com:8080/path").unwrap(),
            "Example.com"
        );
    }

    #[test]
    fn test_already_canonical_is_unchanged() {
        assert_eq!(sanitize_domain("example.com").unwrap(), "example.com");
        assert_eq!(sanitize_domain("sub.my-site.co.uk").unwrap(), "sub.my-site.co.uk");
        assert_eq!(sanitize_domain("localhost").unwrap(), "localhost");
    }

    #[test]
    fn test_whitespace_and_scheme_variants() {
        assert_eq!(sanitize_domain("  http://example.com/ ").unwrap(), "example.com");
        assert_eq!(sanitize_domain("HTTPS://WWW.example.com").unwrap(), "example.com");
        assert_eq!(sanitize_domain("example.com:443").unwrap(), "example.com");
    }

    #[test]
    fn test_repeated_prefixes_reach_fixpoint() {
        assert_eq!(sanitize_domain("www.www.example.com").unwrap(), "example.com");
        assert_eq!(sanitize_domain("example.com:80:8080").unwrap(), "example.com");
        assert_eq!(
            sanitize_domain("https://https://example.com").unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_matches_domain_ignores_shape_and_case() {
        assert!(matches_domain("https://www.Example.com/", "example.com"));
        assert!(matches_domain("example.com", "example.com"));
        assert!(!matches_domain("shop.example.com", "example.com"));
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(sanitize_domain("MySite.COM").unwrap(), "MySite.COM");
    }

    #[test]
    fn test_invalid_inputs() {
        for raw in [
            "",
            "   ",
            "https://",
            "www.",
            "exa mple.com",
            "example..com",
            ".example.com",
            "-bad.com",
            "bad-.com",
            "exa_mple.com",
            "example.com:http",
            "ünicode.com",
        ] {
            assert!(
                matches!(sanitize_domain(raw), Err(DomainError::InvalidDomain { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_error_keeps_original_input() {
        let err = sanitize_domain("https://bad_host/").unwrap_err();
        let DomainError::InvalidDomain { input, .. } = err;
        assert_eq!(input, "https://bad_host/");
    }

    fn domainish() -> impl Strategy<Value = String> {
        prop_oneof![
            "(https?://|HTTP://)?(www\\.|WWW\\.)*[a-zA-Z0-9.-]{0,24}(:[0-9]{0,5})*(/[a-z/]{0,6})?",
            "[ \t]{0,2}[a-zA-Z0-9:/.w-]{0,30}[ \t]{0,2}",
            "\\PC{0,30}",
        ]
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(raw in domainish()) {
            if let Ok(once) = sanitize_domain(&raw) {
                let twice = sanitize_domain(&once);
                prop_assert_eq!(twice.as_deref(), Ok(once.as_str()));
            }
        }

        #[test]
        fn prop_sanitized_output_is_plain_host(raw in domainish()) {
            if let Ok(host) = sanitize_domain(&raw) {
                prop_assert!(!host.contains('/'));
                prop_assert!(!host.contains(':'));
                prop_assert!(!host.is_empty());
                prop_assert_eq!(host.trim(), host.as_str());
            }
        }
    }
}
