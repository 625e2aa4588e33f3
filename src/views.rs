//! Page templates.
//!
//! The listing and topic pages are plain HTML files with `{placeholder}`
//! markers. A help root may override them with `views/index.html` and
//! `views/topic.html`; otherwise the embedded defaults are used.
//!
//! # Placeholders
//!
//! | Template     | Placeholders                                                    |
//! |--------------|-----------------------------------------------------------------|
//! | `index.html` | `title` `description` `filters` `topics` `pager` `version`      |
//! | `topic.html` | `name` `title` `description` `tags` `markup` `version`          |
//!
//! Metadata is HTML-escaped; `markup` is inserted as-is. Unknown
//! placeholders are left untouched.

use crate::{
    index::{Index, ListingQuery, Pagination},
    topic::Topic,
};
use anyhow::{Context, Result};
use quick_xml::escape::escape;
use regex::{Captures, Regex};
use std::{fs, path::Path, sync::LazyLock};

// ============================================================================
// Constants - HTML Templates
// ============================================================================

/// Listing page template (embedded at compile time)
const INDEX_TEMPLATE: &str = include_str!("embed/views/index.html");

/// Topic page template (embedded at compile time)
const TOPIC_TEMPLATE: &str = include_str!("embed/views/topic.html");

/// Default stylesheet, served when the assets directory has none.
pub const STYLESHEET: &str = include_str!("embed/assets/css/main.css");

/// URL path (below `/`) of the default stylesheet.
pub const STYLESHEET_PATH: &str = "css/main.css";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

// ============================================================================
// Page Data
// ============================================================================

/// Everything the listing template shows.
#[derive(Debug)]
pub struct IndexPageData<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// The visible page of topics.
    pub topics: &'a Index,
    pub active_filters: &'a [String],
    pub pagination: &'a Pagination,
    /// The request's query, used to build pager and filter links.
    pub query: &'a ListingQuery,
}

/// Everything the topic template shows.
#[derive(Debug)]
pub struct TopicPageData<'a> {
    /// A hydrated topic.
    pub topic: &'a Topic,
}

// ============================================================================
// Views
// ============================================================================

/// Loaded page templates.
#[derive(Debug, Clone)]
pub struct Views {
    index: String,
    topic: String,
}

impl Default for Views {
    fn default() -> Self {
        Self {
            index: INDEX_TEMPLATE.to_owned(),
            topic: TOPIC_TEMPLATE.to_owned(),
        }
    }
}

impl Views {
    /// Load templates from `dir`, falling back to the embedded ones per file.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            index: read_or(dir, "index.html", INDEX_TEMPLATE)?,
            topic: read_or(dir, "topic.html", TOPIC_TEMPLATE)?,
        })
    }

    pub fn render_index(&self, data: &IndexPageData<'_>) -> String {
        let topics: Vec<String> = data.topics.iter().map(topic_item).collect();
        let filters: Vec<String> = data
            .active_filters
            .iter()
            .map(|tag| filter_item(tag, data.query, data.pagination.limit))
            .collect();

        fill(&self.index, |key| match key {
            "title" => Some(escape(data.title).into_owned()),
            "description" => Some(escape(data.description).into_owned()),
            "filters" => Some(filters.join("")),
            "topics" => Some(topics.join("\n            ")),
            "pager" => Some(pager(data.pagination, data.query)),
            "version" => Some(env!("CARGO_PKG_VERSION").to_owned()),
            _ => None,
        })
    }

    pub fn render_topic(&self, data: &TopicPageData<'_>) -> String {
        let topic = data.topic;
        fill(&self.topic, |key| match key {
            "name" => Some(escape(topic.name.as_str()).into_owned()),
            "title" => Some(escape(topic.title.as_str()).into_owned()),
            "description" => Some(escape(topic.description.as_str()).into_owned()),
            "tags" => Some(tag_links(&topic.tags)),
            "markup" => Some(topic.markup.clone()),
            "version" => Some(env!("CARGO_PKG_VERSION").to_owned()),
            _ => None,
        })
    }
}

fn read_or(dir: &Path, name: &str, fallback: &str) -> Result<String> {
    let path = dir.join(name);
    if path.is_file() {
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    } else {
        Ok(fallback.to_owned())
    }
}

/// Replace every `{key}` in one pass, so substituted text is never rescanned.
fn fill(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            value(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

// ============================================================================
// Fragments
// ============================================================================

fn topic_item(topic: &Topic) -> String {
    format!(
        r#"<li class="topic"><a href="/{href}">{title}</a><p>{description}</p><ul class="tags">{tags}</ul></li>"#,
        href = urlencoding::encode(&topic.name),
        title = escape(topic.title.as_str()),
        description = escape(topic.description.as_str()),
        tags = tag_links(&topic.tags),
    )
}

fn tag_links(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| {
            format!(
                r#"<li><a href="/?tagged={href}">{tag}</a></li>"#,
                href = urlencoding::encode(tag),
                tag = escape(tag.as_str()),
            )
        })
        .collect()
}

fn filter_item(tag: &str, query: &ListingQuery, limit: usize) -> String {
    let remaining = query.without_tag(tag).to_query_string(0, limit);
    format!(
        r#"<li>{tag} <a href="/?{href}" title="Remove filter">&times;</a></li>"#,
        tag = escape(tag),
        href = escape(remaining.as_str()),
    )
}

fn pager(pagination: &Pagination, query: &ListingQuery) -> String {
    let mut links = Vec::with_capacity(2);
    if let Some(prev) = pagination.prev_skip() {
        let href = query.to_query_string(prev, pagination.limit);
        links.push(format!(r#"<a rel="prev" href="/?{}">Previous</a>"#, escape(href.as_str())));
    }
    if pagination.more_available {
        let href = query.to_query_string(pagination.next_skip(), pagination.limit);
        links.push(format!(r#"<a rel="next" href="/?{}">Next</a>"#, escape(href.as_str())));
    }
    links.join("")
}
