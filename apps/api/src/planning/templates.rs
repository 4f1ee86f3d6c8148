/// Call-to-action line appended to every caption.
pub const CONTACT_LINE: &str = "Chat to us: 021 007 0200 | sales@vinet.co.za";

/// Brand hashtags leading every post, in this order.
pub const BASE_HASHTAGS: [&str; 5] = [
    "#Vinet",
    "#Internet",
    "#Connectivity",
    "#Fibre",
    "#Wireless",
];

/// Caption title used when a record has no title.
pub const FALLBACK_TITLE: &str = "Our services";

/// Image-generation prompt for one post.
///
/// Brand colours are stored on the profile but not substituted here.
pub fn image_prompt(company: &str, title: &str) -> String {
    format!(
        "Minimal ad tile for {company}. Headline: {title}. \
Colors: brand palette if available. Include logo if available."
    )
}
