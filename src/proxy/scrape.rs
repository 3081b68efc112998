// Repository page scraping.
// Last-resort source of a summary when the metadata API is unavailable.

use std::sync::LazyLock;

use regex::Regex;

static HOMEPAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""homepage":\s*"([^"]+)""#).expect("valid homepage pattern"));
static OG_TITLE: LazyLock<Regex> = LazyLock::new(|| meta_pattern("og:title"));
static OG_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| meta_pattern("og:description"));
static TWITTER_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| meta_pattern("twitter:description"));

/// Fields recoverable from a rendered repository page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
}

/// Pull `og:title`, a description, and an embedded homepage out of page HTML.
pub fn scrape_page_meta(html: &str) -> PageMeta {
    let homepage = HOMEPAGE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    PageMeta {
        title: meta_content(&OG_TITLE, html),
        description: meta_content(&OG_DESCRIPTION, html)
            .or_else(|| meta_content(&TWITTER_DESCRIPTION, html)),
        homepage,
    }
}

/// Matches `<meta property|name="{property}" content="...">`, case-insensitively.
fn meta_pattern(property: &str) -> Regex {
    let pattern = format!(
        r#"(?i)<meta[^>]+(?:property|name)=["']{}["'][^>]+content=["']([^"']+)["']"#,
        regex::escape(property)
    );
    Regex::new(&pattern).expect("valid meta pattern")
}

/// Trimmed, non-empty content captured by a meta pattern.
fn meta_content(pattern: &Regex, html: &str) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_full_page() {
        let html = r#"
            <META Property='og:title' content='owner/repo: a thing'>
            <meta name="twitter:description" content="from twitter">
            <meta property="og:description" content="from og">
            <script type="application/json">{"repo":{"homepage": "https://example.com"}}</script>
        "#;

        let meta = scrape_page_meta(html);
        assert_eq!(meta.title.as_deref(), Some("owner/repo: a thing"));
        assert_eq!(meta.description.as_deref(), Some("from og"));
        assert_eq!(meta.homepage.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_twitter_description_fallback() {
        let html = r#"<meta property="twitter:description" content="only twitter">"#;
        assert_eq!(
            scrape_page_meta(html).description.as_deref(),
            Some("only twitter")
        );
    }

    #[test]
    fn test_meta_patterns_target_their_property() {
        assert!(OG_TITLE.as_str().contains(r"og:title"));
        assert!(OG_DESCRIPTION.as_str().contains(r"og:description"));
        assert!(TWITTER_DESCRIPTION.as_str().contains(r"twitter:description"));

        let html = r#"<meta property="og:title" content="  spaced  ">"#;
        assert_eq!(meta_content(&OG_TITLE, html).as_deref(), Some("spaced"));
        assert_eq!(meta_content(&OG_DESCRIPTION, html), None);
    }

    #[test]
    fn test_empty_page() {
        assert_eq!(scrape_page_meta("<html></html>"), PageMeta::default());
    }

    #[test]
    fn test_attribute_order_matters() {
        // content before property is not recognised
        let html = r#"<meta content="x" property="og:title">"#;
        assert_eq!(scrape_page_meta(html).title, None);
    }
}
