use super::link::LinkRecord;
use super::theme::Theme;

/// Label of the catch-all filter tab.
pub const ALL_LABEL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LABEL {
            Self::All
        } else {
            Self::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Named(name) => name,
        }
    }

    /// Exact, case-sensitive category match.
    pub fn matches(&self, link: &LinkRecord) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => link.category == *name,
        }
    }
}

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub category: CategoryFilter,
    pub search: String,
    pub theme: Theme,
}

impl ViewState {
    /// Back to the unfiltered list, keeping the theme.
    pub fn reset_filters(&mut self) {
        self.category = CategoryFilter::All;
        self.search.clear();
    }
}

fn matches_search(link: &LinkRecord, needle: &str) -> bool {
    needle.is_empty() || link.title.to_lowercase().contains(needle)
}

/// Filter `links` by category and title search, keeping their order.
pub fn project(links: &[LinkRecord], filter: &CategoryFilter, search: &str) -> Vec<LinkRecord> {
    let needle = search.to_lowercase();
    links
        .iter()
        .filter(|link| filter.matches(link) && matches_search(link, &needle))
        .cloned()
        .collect()
}

/// Why a projection came out empty. Only used to pick display copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoRecords,
    NoMatches,
}

/// The filtered list handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub links: Vec<LinkRecord>,
}

impl Projection {
    pub fn build(links: &[LinkRecord], view: &ViewState) -> Self {
        Self {
            links: project(links, &view.category, &view.search),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn empty_reason(&self, collection_len: usize) -> Option<EmptyReason> {
        if !self.links.is_empty() {
            None
        } else if collection_len == 0 {
            Some(EmptyReason::NoRecords)
        } else {
            Some(EmptyReason::NoMatches)
        }
    }
}

/// Distinct non-empty categories in first-seen order, for filter tabs.
pub fn categories(links: &[LinkRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for link in links {
        if !link.category.is_empty() && !seen.iter().any(|c| *c == link.category) {
            seen.push(link.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn link(id: i64, title: &str, category: &str) -> LinkRecord {
        LinkRecord {
            id,
            title: title.to_string(),
            url: format!("https://example.com/{}", id),
            category: category.to_string(),
            created_at: Utc.timestamp_opt(1_700_000_000 - id * 60, 0).unwrap(),
        }
    }

    fn sample() -> Vec<LinkRecord> {
        vec![
            link(1, "Go Guide", "Docs"),
            link(2, "Rust Book", "Books"),
            link(3, "docs.rs", "Docs"),
            link(4, "", ""),
        ]
    }

    fn titles(links: &[LinkRecord]) -> Vec<&str> {
        links.iter().map(|l| l.title.as_str()).collect()
    }

    #[test]
    fn category_filter_is_exact() {
        let c = vec![link(1, "Go Guide", "Docs"), link(2, "Rust Book", "Books")];
        let docs = project(&c, &CategoryFilter::from_label("Docs"), "");
        assert_eq!(titles(&docs), vec!["Go Guide"]);

        let lower = project(&c, &CategoryFilter::from_label("docs"), "");
        assert!(lower.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let c = vec![link(1, "Go Guide", "Docs"), link(2, "Rust Book", "Books")];
        let found = project(&c, &CategoryFilter::All, "book");
        assert_eq!(titles(&found), vec!["Rust Book"]);

        let found = project(&c, &CategoryFilter::All, "GUI");
        assert_eq!(titles(&found), vec!["Go Guide"]);
    }

    #[test]
    fn all_with_empty_search_is_identity() {
        let c = sample();
        assert_eq!(project(&c, &CategoryFilter::All, ""), c);
    }

    #[test]
    fn empty_title_only_matches_empty_search() {
        let c = sample();
        let all = project(&c, &CategoryFilter::All, "");
        assert!(all.iter().any(|l| l.id == 4));

        let searched = project(&c, &CategoryFilter::All, "o");
        assert!(searched.iter().all(|l| l.id != 4));
    }

    #[test]
    fn output_is_ordered_subsequence_of_input() {
        let c = sample();
        for filter in [CategoryFilter::All, CategoryFilter::from_label("Docs")] {
            for search in ["", "o", "DOC", "zzz"] {
                let out = project(&c, &filter, search);
                let mut cursor = c.iter();
                for item in &out {
                    assert!(cursor.any(|l| l == item), "{:?} out of order", item.title);
                }
            }
        }
    }

    #[test]
    fn projection_is_idempotent() {
        let c = sample();
        let filter = CategoryFilter::from_label("Docs");
        assert_eq!(project(&c, &filter, "go"), project(&c, &filter, "go"));
    }

    #[test]
    fn empty_reason_distinguishes_no_data_from_no_matches() {
        let view = ViewState {
            search: "nothing like this".into(),
            ..ViewState::default()
        };
        let none = Projection::build(&[], &view);
        assert_eq!(none.empty_reason(0), Some(EmptyReason::NoRecords));

        let c = sample();
        let filtered = Projection::build(&c, &view);
        assert_eq!(filtered.empty_reason(c.len()), Some(EmptyReason::NoMatches));

        let all = Projection::build(&c, &ViewState::default());
        assert_eq!(all.empty_reason(c.len()), None);
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        assert_eq!(categories(&sample()), vec!["Docs", "Books"]);
    }

    #[test]
    fn reset_filters_keeps_theme() {
        let mut view = ViewState {
            category: CategoryFilter::from_label("Docs"),
            search: "go".into(),
            theme: Theme::Light,
        };
        view.reset_filters();
        assert_eq!(view.category, CategoryFilter::All);
        assert!(view.search.is_empty());
        assert_eq!(view.theme, Theme::Light);
    }
}
