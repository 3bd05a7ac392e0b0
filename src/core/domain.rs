use reqwest::Url;

/// Host part of an absolute URL, or "" when it can't be parsed.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Tag name used to pick a category's color. Empty categories share "other".
pub fn tag_slug(category: &str) -> String {
    let slug: String = category
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    if slug.is_empty() { "other".to_string() } else { slug }
}
