//! `[listing]` section configuration.
//!
//! Controls pagination and index caching of the listing page.

use super::defaults;
use crate::index::SliceRule;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[listing]` section in kbase.toml.
///
/// # Example
/// ```toml
/// [listing]
/// page_size = 20
/// slice = "window"   # "literal" (default) or "window"
/// cache = true       # build the index once per process
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ListingConfig {
    /// Topics per page when the request has no `limit`.
    #[serde(default = "defaults::listing::page_size")]
    #[educe(Default = defaults::listing::page_size())]
    pub page_size: usize,

    /// Slicing rule for pages after the first.
    #[serde(default = "defaults::listing::slice")]
    #[educe(Default = defaults::listing::slice())]
    pub slice: SliceRule,

    /// Keep the first successfully built index for the process lifetime.
    /// When `false`, every listing request rebuilds it.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub cache: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_listing_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.listing.slice, SliceRule::Literal);
        assert!(config.listing.cache);
    }

    #[test]
    fn test_listing_override() {
        let config = r#"
            [listing]
            page_size = 25
            slice = "window"
            cache = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.listing.page_size, 25);
        assert_eq!(config.listing.slice, SliceRule::Window);
        assert!(!config.listing.cache);
    }

    #[test]
    fn test_listing_invalid_slice() {
        let config = r#"
            [listing]
            slice = "sideways"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
