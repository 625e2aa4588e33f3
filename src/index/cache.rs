//! Process-wide index caching.
//!
//! Uses `arc-swap` for a lock-free, single-assignment slot:
//!
//! - readers load the slot without locking
//! - a miss builds the index outside any lock
//! - the first successful build is published with compare-and-swap; a
//!   concurrent loser returns the winner's index and drops its own
//! - failed builds are never stored, so the next request retries
//!
//! Nothing ever clears the slot. New or edited topic folders stay invisible
//! to listings until restart, while single topic pages are read fresh.

use super::{Index, IndexBuilder};
use crate::error::TopicError;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Get-or-build access to the topic index.
pub trait IndexCache: Send + Sync {
    fn get_or_build(&self) -> Result<Arc<Index>, TopicError>;
}

/// Select the cache implementation for `[listing] cache`.
pub fn index_cache(builder: IndexBuilder, memoize: bool) -> Box<dyn IndexCache> {
    if memoize {
        Box::new(MemoIndex::new(builder))
    } else {
        Box::new(UncachedIndex::new(builder))
    }
}

// ============================================================================
// Memoized
// ============================================================================

/// Builds once, then serves the same index for the process lifetime.
#[derive(Debug)]
pub struct MemoIndex {
    builder: IndexBuilder,
    slot: ArcSwapOption<Index>,
}

impl MemoIndex {
    pub fn new(builder: IndexBuilder) -> Self {
        Self {
            builder,
            slot: ArcSwapOption::empty(),
        }
    }

    #[cfg(test)]
    pub fn is_built(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl IndexCache for MemoIndex {
    fn get_or_build(&self) -> Result<Arc<Index>, TopicError> {
        if let Some(index) = self.slot.load_full() {
            return Ok(index);
        }

        let built = Arc::new(self.builder.build()?);
        let previous = self
            .slot
            .compare_and_swap(&None::<Arc<Index>>, Some(Arc::clone(&built)));

        Ok(match &*previous {
            Some(winner) => Arc::clone(winner),
            None => built,
        })
    }
}

// ============================================================================
// Uncached
// ============================================================================

/// Rebuilds the index on every call.
#[derive(Debug)]
pub struct UncachedIndex {
    builder: IndexBuilder,
}

impl UncachedIndex {
    pub const fn new(builder: IndexBuilder) -> Self {
        Self { builder }
    }
}

impl IndexCache for UncachedIndex {
    fn get_or_build(&self) -> Result<Arc<Index>, TopicError> {
        self.builder.build().map(Arc::new)
    }
}
