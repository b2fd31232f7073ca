//! Scrub credentials from text that may reach logs or the terminal

use once_cell::sync::Lazy;
use regex::Regex;

static URL_WITH_CREDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)[^:@\s/]+:[^@\s/]+@").expect("valid regex"));

static BEARER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+").expect("valid regex"));

// Long opaque strings are almost always tokens in this tool's output
static POTENTIAL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9_\-]{32,}\b").expect("valid regex"));

/// Replace credentials in `text` with placeholders
#[must_use]
pub fn redact(text: &str) -> String {
    let out = URL_WITH_CREDS.replace_all(text, "$1[REDACTED]@");
    let out = BEARER.replace_all(&out, "$1[REDACTED]");
    POTENTIAL_KEY
        .replace_all(&out, "[REDACTED_KEY]")
        .into_owned()
}
