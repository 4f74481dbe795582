// src/urls/resolve.rs
// =============================================================================
// Turns an href found on a page into something the crawler can classify.
//
// This is a deliberately simple resolver:
// - Absolute links (http://, https://, www.) are kept as they are
// - Fragments (#section) and non-web schemes (mailto:, tel:, ...) are skipped
// - Everything else is appended to the page URL: {page}/{href}
//
// It does NOT collapse "." or ".." segments, and a relative href is always
// joined to the full page path, not its parent directory. So
// ("https://example.com/docs/page", "img.png") becomes
// "https://example.com/docs/page/img.png".
// =============================================================================

use super::canonical::strip_prefix_ci;

const ABSOLUTE_PREFIXES: [&str; 3] = ["http://", "https://", "www."];
const SKIPPED_SCHEMES: [&str; 4] = ["mailto:", "tel:", "javascript:", "data:"];

/// Outcome of resolving one href against its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A crawlable URL (absolute, or joined to the page URL)
    Url(String),
    /// A fragment or non-web link; kept verbatim so it can be marked as seen
    Skipped(String),
}

/// Resolves `href` against the page it was found on.
///
/// Examples:
///   ("https://example.com/page", "/docs")        -> Url("https://example.com/page/docs")
///   ("https://example.com", "https://other.com/") -> Url("https://other.com")
///   ("https://example.com", "#top")               -> Skipped("#top")
pub fn resolve(base: &str, href: &str) -> Resolved {
    let href = href.trim();

    if ABSOLUTE_PREFIXES
        .iter()
        .any(|prefix| strip_prefix_ci(href, prefix).is_some())
    {
        return Resolved::Url(href.trim_end_matches('/').to_string());
    }

    if href.starts_with('#')
        || SKIPPED_SCHEMES
            .iter()
            .any(|scheme| strip_prefix_ci(href, scheme).is_some())
    {
        return Resolved::Skipped(href.to_string());
    }

    // Drop the page's own query string and fragment before joining
    let cut = base.find(|c: char| c == '?' || c == '#').unwrap_or(base.len());
    let base = base[..cut].trim_end_matches('/');

    let joined = format!("{}/{}", base, href.trim_start_matches('/'));
    Resolved::Url(joined.trim_end_matches('/').to_string())
}
