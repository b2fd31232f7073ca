use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Listing endpoints gpctl consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Servers,
    Sites,
}

impl ResourceKind {
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Servers => "/oauth/api/v1/server",
            Self::Sites => "/oauth/api/v1/site",
        }
    }

    /// Fields tried in order for the display name
    const fn name_fields(self) -> &'static [&'static str] {
        match self {
            Self::Servers => &["name"],
            Self::Sites => &["url", "name"],
        }
    }
}

/// The `{id, name}` pair kept in the local caches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: u64,
    pub name: String,
}

/// Reduce a listing response to summaries.
///
/// The API answers either with a bare array or with `{"data": [...]}`. Ids may
/// be numbers or numeric strings.
pub fn normalize_listing(kind: ResourceKind, value: &Value) -> Result<Vec<ResourceSummary>, String> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Err("expected an array or an object with a 'data' array".to_string()),
        },
        _ => return Err("expected an array or an object with a 'data' array".to_string()),
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let id = item
                .get("id")
                .and_then(parse_id)
                .ok_or_else(|| format!("entry {idx} has no numeric 'id'"))?;
            let name = kind
                .name_fields()
                .iter()
                .filter_map(|field| item.get(*field).and_then(Value::as_str))
                .map(str::trim)
                .find(|name| !name.is_empty())
                .ok_or_else(|| format!("entry {idx} has no name"))?;
            Ok(ResourceSummary {
                id,
                name: name.to_string(),
            })
        })
        .collect()
}

fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_and_data_envelope_agree() {
        let bare = json!([{"id": 1, "name": "web-1"}, {"id": "2", "name": "web-2"}]);
        let wrapped = json!({"data": bare.clone(), "meta": {"total": 2}});

        let a = normalize_listing(ResourceKind::Servers, &bare).unwrap();
        let b = normalize_listing(ResourceKind::Servers, &wrapped).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a,
            vec![
                ResourceSummary { id: 1, name: "web-1".into() },
                ResourceSummary { id: 2, name: "web-2".into() },
            ]
        );
    }

    #[test]
    fn test_site_name_prefers_url() {
        let value = json!([
            {"id": 10, "url": "example.com", "name": "Example"},
            {"id": 11, "url": "", "name": "fallback.org"},
        ]);
        let sites = normalize_listing(ResourceKind::Sites, &value).unwrap();
        assert_eq!(sites[0].name, "example.com");
        assert_eq!(sites[1].name, "fallback.org");
    }

    #[test]
    fn test_unusable_shapes() {
        assert!(normalize_listing(ResourceKind::Servers, &json!({"items": []})).is_err());
        assert!(normalize_listing(ResourceKind::Servers, &json!("nope")).is_err());

        let err = normalize_listing(ResourceKind::Servers, &json!([{"id": "x", "name": "a"}]))
            .unwrap_err();
        assert!(err.contains("entry 0"));

        let err = normalize_listing(ResourceKind::Sites, &json!([{"id": 3}])).unwrap_err();
        assert!(err.contains("no name"));
    }

    #[test]
    fn test_empty_listing() {
        assert!(normalize_listing(ResourceKind::Sites, &json!({"data": []}))
            .unwrap()
            .is_empty());
    }
}
