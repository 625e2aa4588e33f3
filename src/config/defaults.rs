//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "Knowledgebase".into()
    }

    pub fn description() -> String {
        "Everything you need to know".into()
    }
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn pages() -> PathBuf {
        "pages".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub fn views() -> PathBuf {
        "views".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}

// ============================================================================
// [listing] Section Defaults
// ============================================================================

pub mod listing {
    use crate::index::{SliceRule, pagination::DEFAULT_PAGE_SIZE};

    pub fn page_size() -> usize {
        DEFAULT_PAGE_SIZE
    }

    pub fn slice() -> SliceRule {
        SliceRule::default()
    }
}
