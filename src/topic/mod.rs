//! Help topics: one folder per topic, one `page.md` per folder.
//!
//! # Document Format
//!
//! ```text
//! title: Getting started          ┐
//! description: First steps        │ front-matter (YAML)
//! tags: [basics, setup]           ┘
//!                                 ← first blank line splits the document
//! # Welcome                       ┐
//!                                 │ body (markdown)
//! ![diagram](./flow.png)          ┘
//! ```
//!
//! # Lifecycle
//!
//! | State    | Metadata | `content` | `markup` | Produced by                |
//! |----------|----------|-----------|----------|----------------------------|
//! | Bare     | empty    | empty     | empty    | [`Topic::new`]             |
//! | Hydrated | set      | set       | set      | [`TopicStore::hydrate`]    |
//! | Stubbed  | set      | empty     | empty    | [`Topic::stub_out`]        |
//!
//! Stubbed and hydrated topics are the same type; check [`Topic::is_hydrated`]
//! before relying on `content` or `markup`.

mod store;

pub use store::TopicStore;

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use regex::Regex;

/// First empty line of a document (LF or CRLF line endings).
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^$").expect("blank line pattern is valid")
});

// ============================================================================
// Topic
// ============================================================================

/// A single help document, identified by its folder name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topic {
    /// Folder slug, unique within the pages directory.
    pub name: String,

    pub title: String,

    pub description: String,

    /// Tags in source order.
    pub tags: Vec<String>,

    /// Raw markdown body. Empty for stubbed topics.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// Rendered HTML. Empty for stubbed topics.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub markup: String,
}

impl Topic {
    /// Create a bare topic carrying only its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether the body has been loaded.
    pub fn is_hydrated(&self) -> bool {
        !self.content.is_empty()
    }

    /// Drop the body and markup, keeping metadata only.
    pub fn stub_out(&mut self) {
        self.content.clear();
        self.markup.clear();
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    fn apply(&mut self, front: FrontMatter, body: &str) {
        self.title = front.title;
        self.description = front.description;
        self.tags = front.tags;
        self.content = body.to_owned();
    }
}

// ============================================================================
// Front-matter
// ============================================================================

/// Metadata block preceding the body.
///
/// Every key is optional. Unknown keys are ignored so topics can carry extra
/// fields for other tools.
#[derive(Debug, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Split a document into front-matter and body on its first blank line.
///
/// Leading line breaks of the body are trimmed. Fails when no blank line
/// exists or the body is empty.
fn split_document(text: &str) -> Result<(&str, &str), &'static str> {
    let mut parts = BLANK_LINE.splitn(text, 2);
    let (Some(front), Some(body)) = (parts.next(), parts.next()) else {
        return Err("missing blank line between front-matter and body");
    };

    let body = body.trim_start_matches(['\r', '\n']);
    if body.trim().is_empty() {
        return Err("empty body");
    }

    Ok((front, body))
}

/// Parse the first YAML document of the front-matter.
///
/// A `---` fenced block is read as its first document; anything after the
/// closing fence is ignored.
fn parse_front_matter(front: &str) -> Result<FrontMatter, String> {
    let document = serde_yaml::Deserializer::from_str(front)
        .next()
        .ok_or("front-matter: no YAML document")?;
    FrontMatter::deserialize(document).map_err(|err| format!("front-matter: {err}"))
}
