//! Extraction ruleset: pattern-based signal mining over raw HTML.
//!
//! Every function here is pure and total: a missing pattern yields an empty
//! string, an empty list, or zero. No DOM is built and HTML entities are left
//! as-is; only sitemap `<loc>` values are XML-unescaped.
//! The patterns are the single place to tune what counts as a title, heading,
//! price, image or link, so both product mining and the page auditor stay in
//! lockstep.

use std::sync::LazyLock;

use quick_xml::escape::unescape;
use regex::Regex;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid h1 regex"));
static META_NAME_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]*name=["']description["'][^>]*content=["']([^"']*)["'][^>]*>"#)
        .expect("valid meta regex")
});
static META_CONTENT_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]*content=["']([^"']*)["'][^>]*name=["']description["'][^>]*>"#)
        .expect("valid meta regex")
});
// No backreferences in `regex`, so each heading level gets its own alternative.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>|<h3[^>]*>(.*?)</h3>").expect("valid heading regex")
});
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bR\d[\d.,]*").expect("valid price regex"));
static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img[^>]*src=["']([^"']+)["']"#).expect("valid img src regex")
});
static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid img tag regex"));
static ALT_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\salt\s*=").expect("valid alt regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*href\s*=").expect("valid link regex"));
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?</script>").expect("valid script regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style.*?</style>").expect("valid style regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>\s*(.*?)\s*</loc>").expect("valid loc regex"));

/// Raw inner text of the first `<title>`, or empty.
pub fn extract_title(html: &str) -> String {
    first_capture(&TITLE_RE, html)
}

/// Raw inner text of the first `<h1>`, or empty.
pub fn extract_h1(html: &str) -> String {
    first_capture(&H1_RE, html)
}

/// Content of the `description` meta tag, accepting either attribute order.
pub fn extract_meta_description(html: &str) -> String {
    let found = first_capture(&META_NAME_FIRST_RE, html);
    if found.is_empty() {
        first_capture(&META_CONTENT_FIRST_RE, html)
    } else {
        found
    }
}

/// All `<h2>`/`<h3>` texts in document order, tag-stripped.
pub fn extract_heading_texts(html: &str) -> Vec<String> {
    HEADING_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|m| strip_tags(m.as_str()))
        .collect()
}

/// Rand-prefixed price tokens such as `R499` or `R1,299.00`, in document order.
/// The `R` is case-sensitive, must start a word and touch the first digit.
pub fn extract_price_tokens(html: &str) -> Vec<String> {
    PRICE_RE
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn extract_image_sources(html: &str) -> Vec<String> {
    IMG_SRC_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Number of `<a href=...>` anchors. Internal and external links are not told apart.
pub fn extract_link_count(html: &str) -> usize {
    LINK_RE.find_iter(html).count()
}

pub fn count_images_missing_alt(html: &str) -> usize {
    IMG_TAG_RE
        .find_iter(html)
        .filter(|tag| !ALT_ATTR_RE.is_match(tag.as_str()))
        .count()
}

/// `<loc>` entries of a sitemap document, trimmed and XML-unescaped, in order.
/// A loc with a broken entity is kept verbatim.
pub fn extract_sitemap_locs(xml: &str) -> Vec<String> {
    LOC_RE
        .captures_iter(xml)
        .filter_map(|cap| cap.get(1))
        .map(|m| {
            let raw = m.as_str();
            unescape(raw).map_or_else(|_| raw.to_string(), |loc| loc.into_owned())
        })
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Removes markup and collapses runs of whitespace to a single space.
pub fn strip_tags(fragment: &str) -> String {
    let without_tags = TAG_RE.replace_all(fragment, "");
    WS_RE.replace_all(&without_tags, " ").trim().to_string()
}

/// Human-readable text of a page with script and style blocks dropped.
pub fn visible_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_styles = STYLE_RE.replace_all(&without_scripts, " ");
    strip_tags(&without_styles)
}

fn first_capture(re: &Regex, haystack: &str) -> String {
    re.captures(haystack)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_h1_are_first_match_raw() {
        let html = "<title>Home &amp; Away</title><h1 class=\"x\">One</h1><h1>Two</h1>";
        assert_eq!(extract_title(html), "Home &amp; Away");
        assert_eq!(extract_h1(html), "One");
    }

    #[test]
    fn test_missing_patterns_yield_empty() {
        let html = "<p>nothing here</p>";
        assert_eq!(extract_title(html), "");
        assert_eq!(extract_h1(html), "");
        assert_eq!(extract_meta_description(html), "");
        assert!(extract_heading_texts(html).is_empty());
        assert!(extract_price_tokens(html).is_empty());
        assert!(extract_image_sources(html).is_empty());
        assert_eq!(extract_link_count(html), 0);
        assert_eq!(count_images_missing_alt(html), 0);
    }

    #[test]
    fn test_meta_description_either_attribute_order() {
        let a = r#"<meta name="description" content="Fast fibre">"#;
        let b = r#"<meta content='Fast fibre' name='description'>"#;
        assert_eq!(extract_meta_description(a), "Fast fibre");
        assert_eq!(extract_meta_description(b), "Fast fibre");
    }

    #[test]
    fn test_headings_in_document_order_and_stripped() {
        let html = "<h3>First</h3><h2 id=\"a\">Second <b>bold</b>\n  text</h2><h4>skip</h4>";
        assert_eq!(
            extract_heading_texts(html),
            vec!["First".to_string(), "Second bold text".to_string()]
        );
    }

    #[test]
    fn test_price_tokens() {
        let html = "From R499 per month, or R1,299.00 once-off";
        assert_eq!(extract_price_tokens(html), vec!["R499", "R1,299.00"]);
    }

    #[test]
    fn test_price_tokens_ignore_words_ending_in_r() {
        assert_eq!(
            extract_price_tokens("valid for 30 days from R499"),
            vec!["R499"]
        );
        assert!(extract_price_tokens("Fiber 100, r99, R 50, BR200").is_empty());
    }

    #[test]
    fn test_images_and_missing_alt() {
        let html = r#"<img src="a.jpg" alt="A"><img src='b.png'><IMG SRC="c.gif">"#;
        assert_eq!(extract_image_sources(html), vec!["a.jpg", "b.png", "c.gif"]);
        assert_eq!(count_images_missing_alt(html), 2);
    }

    #[test]
    fn test_link_count() {
        let html = r##"<a href="/a">a</a><a class="x" href="#top">b</a><a name="c">c</a>"##;
        assert_eq!(extract_link_count(html), 2);
    }

    #[test]
    fn test_sitemap_locs() {
        let xml = "<urlset><url><loc> https://a.test/ </loc></url><url><loc>https://a.test/b</loc></url></urlset>";
        assert_eq!(
            extract_sitemap_locs(xml),
            vec!["https://a.test/", "https://a.test/b"]
        );
    }

    #[test]
    fn test_sitemap_locs_are_unescaped() {
        let xml = "<urlset><url><loc>https://a.test/p?id=1&amp;v=2</loc></url>\
                   <url><loc>https://a.test/&bogus;</loc></url></urlset>";
        assert_eq!(
            extract_sitemap_locs(xml),
            vec!["https://a.test/p?id=1&v=2", "https://a.test/&bogus;"]
        );
    }

    #[test]
    fn test_visible_text_drops_scripts_and_styles() {
        let html = "<style>p{}</style><p>Hello</p><script>var x = 1;</script>  <p>world</p>";
        assert_eq!(visible_text(html), "Hello world");
    }
}
