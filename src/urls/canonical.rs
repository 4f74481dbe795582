// src/urls/canonical.rs
// =============================================================================
// Pure URL helpers: validation, canonical form, root, host and domain.
//
// None of these functions touch the network. They work on the raw string the
// way a crawler sees it: a URL may or may not carry a scheme, and may or may
// not start with "www.". Everything here is case-insensitive on the scheme
// and "www." prefix.
//
// Shape of a URL as these helpers see it:
//
//   https://www.example.com/docs/page?x=1
//   \_____________/\__________/\________/
//       prefix      authority      tail
//
// prefix    = optional scheme + optional "www."
// authority = everything up to the first '/', '?' or '#'
// =============================================================================

const SCHEMES: [&str; 2] = ["http://", "https://"];
const WWW: &str = "www.";

// Strips `prefix` from the start of `s`, ignoring ASCII case
//
// Returns the remainder, or None if `s` does not start with `prefix`
pub(crate) fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

// Splits a URL into (prefix, rest), where prefix is the scheme and/or
// "www." exactly as written in the input
fn split_prefix(url: &str) -> (&str, &str) {
    let mut rest = url;
    for scheme in SCHEMES {
        if let Some(stripped) = strip_prefix_ci(rest, scheme) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = strip_prefix_ci(rest, WWW) {
        rest = stripped;
    }
    let prefix_len = url.len() - rest.len();
    (&url[..prefix_len], rest)
}

// Index where the authority ends inside `rest`
fn authority_end(rest: &str) -> usize {
    rest.find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len())
}

fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Checks that a URL is syntactically well-formed enough to crawl.
///
/// The authority must have 2 to 4 dot-separated labels. Every label must be
/// non-empty and start with an alphanumeric character, `_` or `-`; the first
/// label (the host name) must consist only of those characters.
pub fn validate(url: &str) -> bool {
    let (_, rest) = split_prefix(url);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let authority = rest.split('/').next().unwrap_or("");

    let labels: Vec<&str> = authority.split('.').collect();
    if labels.len() < 2 || labels.len() > 4 {
        return false;
    }

    for label in &labels {
        match label.chars().next() {
            Some(first) if is_label_char(first) => {}
            _ => return false,
        }
    }

    labels[0].chars().all(is_label_char)
}

/// Returns the canonical form used as the deduplication key.
///
/// Whitespace is trimmed, the scheme, "www." and host are lowercased, the
/// path keeps its case, and trailing slashes are removed. Applying it twice
/// gives the same result as applying it once.
pub fn canonicalize(url: &str) -> String {
    let trimmed = url
        .trim()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace());
    let (prefix, rest) = split_prefix(trimmed);
    let end = authority_end(rest);

    format!(
        "{}{}{}",
        prefix.to_ascii_lowercase(),
        rest[..end].to_ascii_lowercase(),
        &rest[end..]
    )
}

/// Returns `{scheme}{www.}{host}` with path, query and fragment discarded.
///
/// The prefix is copied verbatim from the input; if the input has none the
/// result is just the host.
pub fn root(url: &str) -> String {
    let (prefix, rest) = split_prefix(url);
    let rest = rest.trim_matches('/');
    let end = authority_end(rest);
    format!("{}{}", prefix, &rest[..end])
}

/// Returns the authority with scheme and "www." removed
pub fn host(url: &str) -> String {
    let (_, rest) = split_prefix(url);
    let rest = rest.trim_start_matches('/');
    rest[..authority_end(rest)].to_string()
}

/// Returns the last two labels of the host ("a.b.example.com" -> "example.com").
///
/// This approximates the registrable domain. It does not consult the public
/// suffix list, so "example.co.uk" yields "co.uk".
pub fn domain(url: &str) -> String {
    let host = host(url);
    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() <= 2 {
        return host;
    }
    parts[parts.len() - 2..].join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label_counts() {
        assert!(!validate("localhost"));
        assert!(!validate("a.b.c.d.e"));
        assert!(validate("a.b"));
        assert!(validate("a.b.c.d"));
    }

    #[test]
    fn test_validate_strips_prefixes() {
        assert!(validate("https://www.example.com/"));
        assert!(validate("HTTP://Example.com/docs/page"));
        assert!(validate("www.example.com"));
        // "www." is stripped, so only one label remains
        assert!(!validate("www.example"));
    }

    #[test]
    fn test_validate_rejects_bad_labels() {
        assert!(!validate("example..com"));
        assert!(!validate(".example.com"));
        assert!(!validate("exa mple.com"));
        assert!(!validate("ex!ample.com"));
        assert!(!validate("example.*com"));
        assert!(validate("_dmarc.example.com"));
        assert!(validate("my-site.example.com"));
    }

    #[test]
    fn test_validate_accepts_ports() {
        assert!(validate("http://127.0.0.1:8080/page"));
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("  HTTPS://WWW.Example.COM/Docs/ "), "https://www.example.com/Docs");
        assert_eq!(canonicalize("example.com///"), "example.com");
        assert_eq!(canonicalize("Example.com?Q=1"), "example.com?Q=1");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let inputs = [
            "https://www.Example.com/A/b/",
            "WWW.EXAMPLE.COM",
            "example.com / ",
            "http://a.b.c/x?y=Z#Frag",
            "http://127.0.0.1:8080/",
        ];
        for input in inputs {
            let once = canonicalize(input);
            assert_eq!(canonicalize(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_root() {
        assert_eq!(root("https://www.example.com/docs/api?x=1"), "https://www.example.com");
        assert_eq!(root("http://example.com"), "http://example.com");
        assert_eq!(root("www.example.com/a"), "www.example.com");
        assert_eq!(root("example.com/a/b"), "example.com");
        assert_eq!(root("example.com?q=1"), "example.com");
    }

    #[test]
    fn test_host() {
        assert_eq!(host("https://www.a.example.com/x"), "a.example.com");
        assert_eq!(host("example.com"), "example.com");
    }

    #[test]
    fn test_domain() {
        assert_eq!(domain("http://a.b.example.com/x"), "example.com");
        assert_eq!(domain("https://www.example.com"), "example.com");
        assert_eq!(domain("example.com/path"), "example.com");
        assert_eq!(domain("https://example.co.uk"), "co.uk");
    }

    #[test]
    fn test_strip_prefix_ci() {
        assert_eq!(strip_prefix_ci("HTTP://x", "http://"), Some("x"));
        assert_eq!(strip_prefix_ci("ht", "http://"), None);
    }
}
