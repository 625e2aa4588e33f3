//! Topic index: every topic, stubbed, in store order.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  hydrate + stub_out  ┌──────────────┐  get_or_build  ┌──────────┐
//! │  TopicStore  │ ───────────────────► │ IndexBuilder │ ◄───────────── │  Cache   │
//! │ (pages/*/)   │   (fail on first     │  (one pass)  │                │ (memo or │
//! └──────────────┘    bad topic)        └──────────────┘                │ uncached)│
//!                                                                       └────┬─────┘
//!                                              filter_to_tag + paginate      │
//!                                       ◄────────────────────────────────────┘
//! ```
//!
//! The index only ever holds stubbed topics; listing pages never need bodies.

mod cache;
pub mod pagination;

pub use cache::{IndexCache, index_cache};
pub use pagination::{ListingQuery, Pagination, SliceRule};

use crate::{error::TopicError, log, topic::Topic, topic::TopicStore};
use serde::Serialize;

// ============================================================================
// Index
// ============================================================================

/// Ordered sequence of stubbed topics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Index(Vec<Topic>);

impl Index {
    pub const fn new(topics: Vec<Topic>) -> Self {
        Self(topics)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.0.iter()
    }

    /// Topics carrying `tag`, in index order.
    pub fn filter_to_tag(&self, tag: &str) -> Self {
        self.iter().filter(|topic| topic.has_tag(tag)).cloned().collect()
    }

    /// Topics carrying every tag in `tags` (conjunction), in index order.
    ///
    /// An empty `tags` slice returns the whole index.
    pub fn filter_to_tags<S: AsRef<str>>(&self, tags: &[S]) -> Self {
        tags.iter()
            .fold(self.clone(), |filtered, tag| filtered.filter_to_tag(tag.as_ref()))
    }

    /// The visible page of this index; sets `pagination.more_available`.
    pub fn paginate(&self, pagination: &mut Pagination) -> Self {
        Self(pagination.slice(&self.0).to_vec())
    }
}

impl FromIterator<Topic> for Index {
    fn from_iter<I: IntoIterator<Item = Topic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds an [`Index`] from every topic folder of a store.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    store: TopicStore,
}

impl IndexBuilder {
    pub const fn new(store: TopicStore) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &TopicStore {
        &self.store
    }

    /// Hydrate and stub out every topic folder.
    ///
    /// The first topic that fails to load aborts the whole build: a broken
    /// topic makes the listing unavailable instead of silently disappearing.
    pub fn build(&self) -> Result<Index, TopicError> {
        let names = self.store.topic_names()?;

        let mut topics = Vec::with_capacity(names.len());
        for name in &names {
            let mut topic = self.store.hydrate(name)?;
            topic.stub_out();
            debug_assert!(!topic.is_hydrated());
            topics.push(topic);
        }

        log!("index"; "indexed {} topics from {}", topics.len(), self.store.root().display());
        Ok(Index::new(topics))
    }
}
