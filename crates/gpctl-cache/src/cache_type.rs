use std::str::FromStr;

use gpctl_utils::error::CacheError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, VariantNames};

/// The listings gpctl keeps locally
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CacheType {
    Sites,
    Servers,
}

impl CacheType {
    /// File name inside the cache directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Sites => "sites.json",
            Self::Servers => "servers.json",
        }
    }

    /// Command a user can run to create or refresh this cache
    #[must_use]
    pub fn populate_command(self) -> String {
        format!("gpctl cache refresh {self}")
    }

    /// Name of the cross-process lock guarding population
    #[must_use]
    pub fn lock_key(self) -> String {
        format!("cache-{self}")
    }

    /// Parse a user-supplied name, failing with `UnknownCacheType`
    pub fn parse(name: &str) -> Result<Self, CacheError> {
        Self::from_str(name.trim()).map_err(|_| CacheError::UnknownCacheType {
            name: name.to_string(),
            expected: Self::VARIANTS.join(", "),
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        assert_eq!(CacheType::Sites.file_name(), "sites.json");
        assert_eq!(CacheType::Servers.file_name(), "servers.json");
        assert_eq!(
            CacheType::Sites.populate_command(),
            "gpctl cache refresh sites"
        );
        assert_eq!(CacheType::Servers.lock_key(), "cache-servers");
    }

    #[test]
    fn test_parse_known_names() {
        assert_eq!(CacheType::parse("sites").unwrap(), CacheType::Sites);
        assert_eq!(CacheType::parse("Servers").unwrap(), CacheType::Servers);
        assert_eq!(CacheType::parse(" sites ").unwrap(), CacheType::Sites);
    }

    #[test]
    fn test_parse_unknown_name() {
        match CacheType::parse("plugins") {
            Err(CacheError::UnknownCacheType { name, expected }) => {
                assert_eq!(name, "plugins");
                assert_eq!(expected, "sites, servers");
            }
            other => panic!("expected UnknownCacheType, got {other:?}"),
        }
    }

    #[test]
    fn test_all_types() {
        let all: Vec<_> = CacheType::all().collect();
        assert_eq!(all, vec![CacheType::Sites, CacheType::Servers]);
    }
}
