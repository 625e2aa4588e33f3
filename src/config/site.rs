//! `[site]` section configuration.
//!
//! Contains the listing page's heading.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in kbase.toml - listing page metadata.
///
/// # Example
/// ```toml
/// [site]
/// title = "Acme Help Center"
/// description = "Guides and answers for Acme users"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Heading of the listing page.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// Subheading of the listing page.
    #[serde(default = "defaults::site::description")]
    #[educe(Default = defaults::site::description())]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_site_config_full() {
        let config = r#"
            [site]
            title = "Acme Help"
            description = "Answers"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.title, "Acme Help");
        assert_eq!(config.site.description, "Answers");
    }

    #[test]
    fn test_site_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.site.title, "Knowledgebase");
        assert_eq!(config.site.description, "Everything you need to know");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [site]
            title = "Test"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn test_site_config_unicode() {
        let config = r#"
            [site]
            title = "Hilfe 🚀"
            description = "Alles, was Sie wissen müssen"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.title, "Hilfe 🚀");
        assert_eq!(config.site.description, "Alles, was Sie wissen müssen");
    }
}
