use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A shared link as stored in the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LinkRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(deserialize_with = "utc_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub category: String,
}

impl NewLink {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            category: category.into(),
        }
    }
}

/// Rows written by older clients carry `null` in text columns; read those as "".
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// `timestamptz` columns carry an offset; plain `timestamp` columns don't and are taken as UTC.
fn utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid created_at: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_store_row() {
        let json = r#"{
            "id": 7,
            "created_at": "2025-03-01T10:15:00.123456+00:00",
            "title": "Rust Book",
            "url": "https://doc.rust-lang.org/book/",
            "category": "Books"
        }"#;
        let link: LinkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(link.id, 7);
        assert_eq!(link.title, "Rust Book");
        assert_eq!(link.category, "Books");
        assert_eq!(link.created_at.timestamp(), 1_740_824_100);
    }

    #[test]
    fn null_and_missing_text_fields_read_as_empty() {
        let json = r#"{"id": 1, "created_at": "2025-03-01T10:15:00Z", "title": null, "url": "x"}"#;
        let link: LinkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(link.title, "");
        assert_eq!(link.category, "");
        assert_eq!(link.url, "x");
    }

    #[test]
    fn timestamp_without_offset_reads_as_utc() {
        let json = r#"{"id": 1, "created_at": "2025-03-01T10:15:00.123456", "title": "a", "url": "b"}"#;
        let link: LinkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(link.created_at.timestamp(), 1_740_824_100);

        let json = r#"{"id": 2, "created_at": "2025-03-01 10:15:00", "title": "a", "url": "b"}"#;
        let link: LinkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(link.created_at.timestamp(), 1_740_824_100);
    }

    #[test]
    fn offset_is_applied_before_storing() {
        let json = r#"{"id": 1, "created_at": "2025-03-01T12:15:00+02:00", "title": "a", "url": "b"}"#;
        let link: LinkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(link.created_at.timestamp(), 1_740_824_100);
    }

    #[test]
    fn unparseable_timestamp_is_rejected() {
        let json = r#"{"id": 1, "created_at": "yesterday", "title": "a", "url": "b"}"#;
        assert!(serde_json::from_str::<LinkRecord>(json).is_err());
    }

    #[test]
    fn new_link_serializes_without_store_fields() {
        let value = serde_json::to_value(NewLink::new("Go Guide", "https://go.dev", "Docs")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"title": "Go Guide", "url": "https://go.dev", "category": "Docs"})
        );
    }
}
