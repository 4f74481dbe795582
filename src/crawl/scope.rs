// src/crawl/scope.rs
// =============================================================================
// Decides which discovered links the crawler recurses into.
//
// | Mode        | Recurse into a link when...                              |
// |-------------|----------------------------------------------------------|
// | none        | never (links are still recorded and written out)         |
// | domain      | its host equals the origin's host ("www." ignored)       |
// | domain-tree | it starts with the origin's root, at a segment boundary  |
// | all         | always                                                   |
//
// "domain" compares full hosts, so a.example.com and b.example.com are
// different domains. All comparisons ignore ASCII case.
// =============================================================================

use clap::ValueEnum;

use crate::urls::{host, root, strip_prefix_ci};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScopeMode {
    /// Do not follow links
    #[default]
    None,
    /// Follow links on the same host
    Domain,
    /// Follow links under the origin's root URL
    DomainTree,
    /// Follow every link
    All,
}

impl ScopeMode {
    /// Whether links are followed at all ("fork mode")
    pub fn forks(self) -> bool {
        self != ScopeMode::None
    }

    /// Whether `link`, found on `origin`, may be crawled next
    pub fn allows(self, origin: &str, link: &str) -> bool {
        match self {
            ScopeMode::None => false,
            ScopeMode::Domain => host(link).eq_ignore_ascii_case(&host(origin)),
            ScopeMode::DomainTree => {
                let root = root(origin);
                match strip_prefix_ci(link, &root) {
                    // "https://a.com" must not match "https://a.com.evil.net"
                    Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#', ':']),
                    None => false,
                }
            }
            ScopeMode::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_recurses() {
        assert!(!ScopeMode::None.forks());
        assert!(!ScopeMode::None.allows("https://example.com", "https://example.com/a"));
    }

    #[test]
    fn test_domain_rejects_sibling_subdomain() {
        assert!(!ScopeMode::Domain.allows("http://a.example.com/x", "http://b.example.com/y"));
    }

    #[test]
    fn test_domain_accepts_same_host() {
        assert!(ScopeMode::Domain.allows("http://a.example.com/x", "https://A.Example.com/z"));
        assert!(ScopeMode::Domain.allows("https://www.example.com", "example.com/about"));
    }

    #[test]
    fn test_domain_tree() {
        let origin = "https://www.example.com/docs";
        assert!(ScopeMode::DomainTree.allows(origin, "https://www.example.com/docs/api"));
        assert!(ScopeMode::DomainTree.allows(origin, "https://www.example.com"));
        assert!(!ScopeMode::DomainTree.allows(origin, "https://other.com"));
        assert!(!ScopeMode::DomainTree.allows(origin, "https://www.example.com.evil.net/x"));
        // the scheme is part of the root
        assert!(!ScopeMode::DomainTree.allows(origin, "http://www.example.com/docs"));
    }

    #[test]
    fn test_all_always_recurses() {
        assert!(ScopeMode::All.forks());
        assert!(ScopeMode::All.allows("https://example.com", "https://anything.org"));
    }

    #[test]
    fn test_value_names() {
        assert_eq!(ScopeMode::from_str("domain-tree", true), Ok(ScopeMode::DomainTree));
        assert_eq!(ScopeMode::from_str("NONE", true), Ok(ScopeMode::None));
    }
}
