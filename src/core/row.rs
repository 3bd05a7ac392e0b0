use chrono::{DateTime, Utc};

use super::age::{RelativeAge, relative_age};
use super::domain::{extract_domain, tag_slug};
use super::link::LinkRecord;

/// Everything a renderer needs for one list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// 1-based position within the projection.
    pub position: usize,
    pub id: i64,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub age: RelativeAge,
    pub category: String,
    pub tag: String,
}

impl DisplayRow {
    pub fn build(position: usize, link: &LinkRecord, now: DateTime<Utc>) -> Self {
        Self {
            position,
            id: link.id,
            title: link.title.clone(),
            url: link.url.clone(),
            domain: extract_domain(&link.url),
            age: relative_age(link.created_at, now),
            category: link.category.clone(),
            tag: tag_slug(&link.category),
        }
    }

    pub fn build_all(links: &[LinkRecord], now: DateTime<Utc>) -> Vec<Self> {
        links
            .iter()
            .enumerate()
            .map(|(i, link)| Self::build(i + 1, link, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rows_are_numbered_from_one() {
        let now = Utc::now();
        let links = vec![
            LinkRecord {
                id: 10,
                title: "Tokio".into(),
                url: "https://tokio.rs/tokio/tutorial".into(),
                category: "Docs".into(),
                created_at: now - Duration::hours(5),
            },
            LinkRecord {
                id: 9,
                title: "Broken".into(),
                url: "::nope::".into(),
                category: String::new(),
                created_at: now - Duration::seconds(3),
            },
        ];
        let rows = DisplayRow::build_all(&links, now);

        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].domain, "tokio.rs");
        assert_eq!(rows[0].age, RelativeAge::Hours(5));
        assert_eq!(rows[0].tag, "docs");

        assert_eq!(rows[1].position, 2);
        assert_eq!(rows[1].domain, "");
        assert_eq!(rows[1].age, RelativeAge::JustNow);
        assert_eq!(rows[1].tag, "other");
    }
}
