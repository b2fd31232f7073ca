use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use gpctl_utils::error::ProfileError;
use tracing::debug;

use crate::secret::SecretToken;

/// A named API token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialProfile {
    pub name: String,
    pub token: SecretToken,
}

impl CredentialProfile {
    #[must_use]
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: SecretToken::new(token),
        }
    }
}

/// Read-only source of credential profiles
pub trait TokenStore: Send + Sync {
    /// All profiles in file order
    fn profiles(&self) -> Result<Vec<CredentialProfile>, ProfileError>;

    /// Where profiles come from, for error messages
    fn describe(&self) -> String;
}

/// Profiles from a `name=token` file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn profiles(&self) -> Result<Vec<CredentialProfile>, ProfileError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ProfileError::Io {
                    path: self.describe(),
                    source,
                });
            }
        };
        let profiles = parse_token_file(&text, &self.describe())?;
        debug!(path = %self.path.display(), count = profiles.len(), "Loaded credential profiles");
        Ok(profiles)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed profiles for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    profiles: Vec<CredentialProfile>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new(profiles: Vec<CredentialProfile>) -> Self {
        Self { profiles }
    }
}

impl TokenStore for MemoryTokenStore {
    fn profiles(&self) -> Result<Vec<CredentialProfile>, ProfileError> {
        Ok(self.profiles.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Parse token file content.
///
/// One `name=token` per line. Blank lines and `#` comments are skipped, an
/// `export ` prefix is allowed, and the token may be wrapped in matching
/// single or double quotes. Names are limited to ASCII alphanumerics, `.`,
/// `_` and `-` because they also name on-disk quota records.
pub fn parse_token_file(text: &str, path: &str) -> Result<Vec<CredentialProfile>, ProfileError> {
    let mut profiles = Vec::new();
    let mut seen = HashSet::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map_or(line, str::trim_start);

        let malformed = |reason: &str| ProfileError::Malformed {
            path: path.to_string(),
            line: line_no,
            reason: reason.to_string(),
        };

        let (name, token) = line
            .split_once('=')
            .ok_or_else(|| malformed("expected 'name=token'"))?;
        let name = name.trim();
        let token = unquote(token.trim());

        if !is_valid_name(name) {
            return Err(malformed(
                "profile names may only contain letters, digits, '.', '_' and '-'",
            ));
        }
        if token.is_empty() {
            return Err(malformed("token is empty"));
        }
        if !seen.insert(name.to_string()) {
            return Err(ProfileError::Duplicate {
                path: path.to_string(),
                name: name.to_string(),
                line: line_no,
            });
        }

        profiles.push(CredentialProfile::new(name, token));
    }

    Ok(profiles)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
