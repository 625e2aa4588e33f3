//! On-disk topic storage.
//!
//! All paths are derived from the configured pages directory:
//!
//! | Item          | Path                        |
//! |---------------|-----------------------------|
//! | Topic         | `<pages>/<name>/page.md`    |
//! | Topic asset   | `<pages>/<name>/<asset>`    |

use super::{Topic, parse_front_matter, split_document};
use crate::{config::SiteConfig, error::TopicError, markdown};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// File name of the document inside each topic folder.
pub const PAGE_FILE: &str = "page.md";

/// Reads topics from a pages directory.
#[derive(Debug, Clone)]
pub struct TopicStore {
    pages: PathBuf,
}

impl TopicStore {
    pub fn new(pages: impl Into<PathBuf>) -> Self {
        Self {
            pages: pages.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.paths.pages)
    }

    pub fn root(&self) -> &Path {
        &self.pages
    }

    /// Path of a topic's document.
    pub fn page_path(&self, name: &str) -> PathBuf {
        self.pages.join(name).join(PAGE_FILE)
    }

    /// Path of a file stored next to a topic's document.
    pub fn asset_path(&self, topic: &str, asset: &str) -> PathBuf {
        self.pages.join(topic).join(asset)
    }

    /// Read a topic's metadata and body, without rendering it.
    pub fn load(&self, name: &str) -> Result<Topic, TopicError> {
        let path = self.page_path(name);
        if !is_valid_name(name) {
            return Err(TopicError::NotFound(path));
        }

        let text = fs::read_to_string(&path).map_err(|err| TopicError::from_io(&path, err))?;
        let (front, body) = split_document(&text).map_err(|reason| TopicError::invalid(&path, reason))?;
        let front = parse_front_matter(front).map_err(|reason| TopicError::invalid(&path, reason))?;

        let mut topic = Topic::new(name);
        topic.apply(front, body);
        Ok(topic)
    }

    /// Read a topic and render its body to HTML.
    pub fn hydrate(&self, name: &str) -> Result<Topic, TopicError> {
        let mut topic = self.load(name)?;
        topic.markup = markdown::render(&topic.content, &topic.name);
        Ok(topic)
    }

    /// Names of all topic folders, sorted by name.
    ///
    /// Plain files directly under the pages directory are skipped.
    pub fn topic_names(&self) -> Result<Vec<String>, TopicError> {
        let entries = fs::read_dir(&self.pages).map_err(|err| TopicError::from_io(&self.pages, err))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| TopicError::from_io(&self.pages, err))?;
            let is_dir = entry
                .file_type()
                .map_err(|err| TopicError::from_io(entry.path(), err))?
                .is_dir();
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort_unstable();
        Ok(names)
    }
}

/// A topic name is a single path segment.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
