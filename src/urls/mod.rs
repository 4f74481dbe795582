// src/urls/mod.rs
// =============================================================================
// URL canonicalizer: pure string functions, no I/O.
//
// Submodules:
// - canonical: validate, canonicalize, root, host, domain
// - resolve: turn an href into an absolute URL (or skip it)
// =============================================================================

mod canonical;
mod resolve;

pub(crate) use canonical::strip_prefix_ci;
pub use canonical::{canonicalize, domain, host, root, validate};
pub use resolve::{resolve, Resolved};
