//! Offline commands over the topic index: `check` and `list`.
//!
//! Both build the index exactly like the server does, so a help root that
//! passes `check` also serves a listing.

use crate::{
    cli::ListArgs,
    config::SiteConfig,
    index::{Index, IndexBuilder, ListingQuery, Pagination},
    log,
    topic::TopicStore,
};
use anyhow::{Context, Result};

/// Build the index once and report how many topics it holds.
pub fn check_topics(config: &SiteConfig) -> Result<usize> {
    let builder = IndexBuilder::new(TopicStore::from_config(config));
    let index = builder
        .build()
        .with_context(|| format!("Topic check failed in {}", builder.store().root().display()))?;

    log!("check"; "{} topics ok", index.len());
    Ok(index.len())
}

/// Print one page of the listing to stdout.
pub fn list_topics(config: &SiteConfig, args: &ListArgs) -> Result<()> {
    let (page, pagination) = listing_page(config, args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", format_lines(&page));
        if pagination.more_available {
            log!("list"; "more topics available, use --skip {}", pagination.next_skip());
        }
    }
    Ok(())
}

/// Filter and paginate a freshly built index.
fn listing_page(config: &SiteConfig, args: &ListArgs) -> Result<(Index, Pagination)> {
    let index = IndexBuilder::new(TopicStore::from_config(config)).build()?;

    let query = ListingQuery {
        tagged: args.tagged.clone(),
        skip: args.skip,
        limit: args.limit,
    };
    let mut pagination = Pagination::from_query(&query, config.listing.page_size, config.listing.slice);
    let page = index.filter_to_tags(&query.tagged).paginate(&mut pagination);

    Ok((page, pagination))
}

/// One line per topic: `name  title  [tags]`.
fn format_lines(index: &Index) -> String {
    let width = index.iter().map(|t| t.name.len()).max().unwrap_or(0);

    index
        .iter()
        .map(|topic| {
            let tags = if topic.tags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", topic.tags.join(", "))
            };
            format!("{:width$}  {}{tags}\n", topic.name, topic.title)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{SliceRule, tests::write_topic};
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.paths.resolve(dir.path());
        config
    }

    fn help_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        write_topic(&pages, "alpha", &["a"]);
        write_topic(&pages, "beta", &["a", "b"]);
        write_topic(&pages, "gamma", &[]);
        dir
    }

    fn names(index: &Index) -> Vec<&str> {
        index.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_check_topics_counts() {
        let dir = help_root();
        assert_eq!(check_topics(&config_for(&dir)).unwrap(), 3);
    }

    #[test]
    fn test_check_topics_fails_on_broken_topic() {
        let dir = help_root();
        fs::write(dir.path().join("pages/beta/page.md"), "title: Beta").unwrap();

        let err = check_topics(&config_for(&dir)).unwrap_err();
        assert!(err.to_string().contains("Topic check failed"));
        assert!(format!("{err:#}").contains("beta"));
    }

    #[test]
    fn test_listing_page_filters_and_paginates() {
        let dir = help_root();
        let config = config_for(&dir);

        let args = ListArgs {
            tagged: vec!["a".into()],
            ..ListArgs::default()
        };
        let (page, pagination) = listing_page(&config, &args).unwrap();
        assert_eq!(names(&page), vec!["alpha", "beta"]);
        assert!(!pagination.more_available);

        let args = ListArgs {
            limit: Some(1),
            ..ListArgs::default()
        };
        let (page, pagination) = listing_page(&config, &args).unwrap();
        assert_eq!(names(&page), vec!["alpha"]);
        assert!(pagination.more_available);
    }

    #[test]
    fn test_listing_page_uses_configured_rule() {
        let dir = help_root();
        let mut config = config_for(&dir);
        config.listing.slice = SliceRule::Window;

        let args = ListArgs {
            skip: Some(1),
            limit: Some(1),
            ..ListArgs::default()
        };
        let (page, _) = listing_page(&config, &args).unwrap();
        assert_eq!(names(&page), vec!["beta"]);
    }

    #[test]
    fn test_format_lines() {
        let dir = help_root();
        let (page, _) = listing_page(&config_for(&dir), &ListArgs::default()).unwrap();

        assert_eq!(
            format_lines(&page),
            "alpha  ALPHA  [a]\nbeta   BETA  [a, b]\ngamma  GAMMA\n"
        );
    }
}
