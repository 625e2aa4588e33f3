//! Listing pagination and query parsing.
//!
//! # Slice Rules
//!
//! | Condition                  | Returned slice                     | `more_available` |
//! |----------------------------|------------------------------------|------------------|
//! | `len > skip + limit`       | `Literal`: `[skip..limit]`         | `true`           |
//! |                            | `Window`:  `[skip..skip + limit]`  | `true`           |
//! | `len < skip`               | empty                              | `false`          |
//! | otherwise                  | `[skip..]`                         | `false`          |
//!
//! `Literal` matches the historical listing, where a page with `skip > 0`
//! holds `limit - skip` topics (none once `skip >= limit`). `Window` returns
//! full pages. The rule is chosen with `[listing] slice` in `kbase.toml`.

use serde::{Deserialize, Serialize};

/// Page size used when a request does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How the first branch of pagination slices the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceRule {
    /// `[skip..limit]`
    #[default]
    Literal,
    /// `[skip..skip + limit]`
    Window,
}

// ============================================================================
// Pagination
// ============================================================================

/// Request and response state of one listing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Offset into the (filtered) index.
    pub skip: usize,

    /// Page size, always > 0.
    pub limit: usize,

    /// Set by [`Pagination::slice`]: more topics follow this page.
    pub more_available: bool,

    #[serde(skip)]
    pub rule: SliceRule,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A zero `limit` falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit: if limit == 0 { DEFAULT_PAGE_SIZE } else { limit },
            more_available: false,
            rule: SliceRule::default(),
        }
    }

    pub const fn with_rule(mut self, rule: SliceRule) -> Self {
        self.rule = rule;
        self
    }

    /// Build from a parsed query, using `default_limit` when none was given.
    pub fn from_query(query: &ListingQuery, default_limit: usize, rule: SliceRule) -> Self {
        let limit = query.limit.filter(|l| *l > 0).unwrap_or(default_limit);
        Self::new(query.skip.unwrap_or(0), limit).with_rule(rule)
    }

    /// The visible part of `items`; updates `more_available`.
    pub fn slice<'a, T>(&mut self, items: &'a [T]) -> &'a [T] {
        let (skip, limit) = (self.skip, self.limit);
        let end = skip.saturating_add(limit);

        if items.len() > end {
            self.more_available = true;
            match self.rule {
                SliceRule::Literal => items.get(skip..limit).unwrap_or(&[]),
                SliceRule::Window => &items[skip..end],
            }
        } else if items.len() < skip {
            self.more_available = false;
            &[]
        } else {
            self.more_available = false;
            &items[skip..]
        }
    }

    /// Offset of the following page.
    pub const fn next_skip(&self) -> usize {
        self.skip.saturating_add(self.limit)
    }

    /// Offset of the preceding page, if this is not the first one.
    pub const fn prev_skip(&self) -> Option<usize> {
        if self.skip == 0 {
            None
        } else {
            Some(self.skip.saturating_sub(self.limit))
        }
    }
}

// ============================================================================
// Query Parsing
// ============================================================================

/// Listing parameters of a request URL.
///
/// | Parameter | Meaning                                  |
/// |-----------|------------------------------------------|
/// | `tagged`  | repeatable tag filter, all must match    |
/// | `skip`    | offset, invalid values are ignored       |
/// | `limit`   | page size, invalid or zero are ignored   |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub tagged: Vec<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl ListingQuery {
    /// Parse a raw query string (without the leading `?`).
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);

            match decode_component(key).as_str() {
                "tagged" if !value.is_empty() => parsed.tagged.push(value),
                "skip" => parsed.skip = value.trim().parse().ok(),
                "limit" => parsed.limit = value.trim().parse::<usize>().ok().filter(|l| *l > 0),
                _ => {}
            }
        }

        parsed
    }

    /// Encode back into a query string, with `skip` replaced.
    pub fn to_query_string(&self, skip: usize, limit: usize) -> String {
        let mut pairs: Vec<String> = self
            .tagged
            .iter()
            .map(|tag| format!("tagged={}", urlencoding::encode(tag)))
            .collect();
        pairs.push(format!("skip={skip}"));
        pairs.push(format!("limit={limit}"));
        pairs.join("&")
    }

    /// The same query without one tag filter.
    pub fn without_tag(&self, tag: &str) -> Self {
        Self {
            tagged: self.tagged.iter().filter(|t| *t != tag).cloned().collect(),
            skip: None,
            limit: self.limit,
        }
    }
}

/// Form-decode one query component (`+` is a space).
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE: [u8; 5] = [0, 1, 2, 3, 4];

    #[test]
    fn test_all_fit_on_one_page() {
        let mut p = Pagination::new(0, 10);
        assert_eq!(p.slice(&FIVE), &FIVE);
        assert!(!p.more_available);
    }

    #[test]
    fn test_first_page_with_more() {
        let mut p = Pagination::new(0, 2);
        assert_eq!(p.slice(&FIVE), &[0, 1]);
        assert!(p.more_available);
    }

    #[test]
    fn test_skip_past_end() {
        let mut p = Pagination::new(10, 10);
        assert!(p.slice(&FIVE).is_empty());
        assert!(!p.more_available);
    }

    #[test]
    fn test_skip_equal_to_len() {
        let mut p = Pagination::new(5, 10);
        assert!(p.slice(&FIVE).is_empty());
        assert!(!p.more_available);
    }

    #[test]
    fn test_last_partial_page() {
        let mut p = Pagination::new(3, 10);
        assert_eq!(p.slice(&FIVE), &[3, 4]);
        assert!(!p.more_available);
    }

    #[test]
    fn test_exact_fit_has_no_more() {
        let mut p = Pagination::new(0, 5);
        assert_eq!(p.slice(&FIVE), &FIVE);
        assert!(!p.more_available);
    }

    #[test]
    fn test_literal_rule_with_skip() {
        // [skip..limit]: the page shrinks by `skip`.
        let mut p = Pagination::new(1, 2);
        assert_eq!(p.slice(&FIVE), &[1]);
        assert!(p.more_available);

        let mut p = Pagination::new(2, 2);
        assert!(p.slice(&FIVE).is_empty());
        assert!(p.more_available);
    }

    #[test]
    fn test_literal_rule_skip_beyond_limit() {
        let mut p = Pagination::new(3, 1);
        assert!(p.slice(&FIVE).is_empty());
        assert!(p.more_available);
    }

    #[test]
    fn test_window_rule_with_skip() {
        let mut p = Pagination::new(1, 2).with_rule(SliceRule::Window);
        assert_eq!(p.slice(&FIVE), &[1, 2]);
        assert!(p.more_available);

        let mut p = Pagination::new(2, 2).with_rule(SliceRule::Window);
        assert_eq!(p.slice(&FIVE), &[2, 3]);
        assert!(p.more_available);

        let mut p = Pagination::new(4, 2).with_rule(SliceRule::Window);
        assert_eq!(p.slice(&FIVE), &[4]);
        assert!(!p.more_available);
    }

    #[test]
    fn test_more_available_is_reset() {
        let mut p = Pagination::new(0, 2);
        p.slice(&FIVE);
        assert!(p.more_available);
        p.slice(&FIVE[..2]);
        assert!(!p.more_available);
    }

    #[test]
    fn test_zero_limit_uses_default() {
        assert_eq!(Pagination::new(0, 0).limit, DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::default().limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_skip_neighbours() {
        let p = Pagination::new(4, 2);
        assert_eq!(p.next_skip(), 6);
        assert_eq!(p.prev_skip(), Some(2));
        assert_eq!(Pagination::new(1, 10).prev_skip(), Some(0));
        assert_eq!(Pagination::new(0, 10).prev_skip(), None);
    }

    #[test]
    fn test_parse_query() {
        let q = ListingQuery::parse("tagged=a&tagged=b%20c&skip=4&limit=2&other=1");
        assert_eq!(q.tagged, vec!["a", "b c"]);
        assert_eq!(q.skip, Some(4));
        assert_eq!(q.limit, Some(2));
    }

    #[test]
    fn test_parse_query_invalid_values() {
        let q = ListingQuery::parse("skip=-3&limit=0&tagged=&tagged=x+y");
        assert_eq!(q.skip, None);
        assert_eq!(q.limit, None);
        assert_eq!(q.tagged, vec!["x y"]);

        let q = ListingQuery::parse("limit=abc&skip");
        assert_eq!(q, ListingQuery::default());
    }

    #[test]
    fn test_parse_empty_query() {
        assert_eq!(ListingQuery::parse(""), ListingQuery::default());
    }

    #[test]
    fn test_from_query_defaults() {
        let p = Pagination::from_query(&ListingQuery::default(), 7, SliceRule::Window);
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, 7);
        assert_eq!(p.rule, SliceRule::Window);

        let q = ListingQuery::parse("skip=3&limit=4");
        let p = Pagination::from_query(&q, 10, SliceRule::Literal);
        assert_eq!((p.skip, p.limit), (3, 4));
    }

    #[test]
    fn test_to_query_string() {
        let q = ListingQuery::parse("tagged=a%26b&tagged=c");
        assert_eq!(q.to_query_string(10, 5), "tagged=a%26b&tagged=c&skip=10&limit=5");
        assert_eq!(ListingQuery::default().to_query_string(0, 10), "skip=0&limit=10");
    }

    #[test]
    fn test_without_tag() {
        let q = ListingQuery::parse("tagged=a&tagged=b&skip=10&limit=3");
        let rest = q.without_tag("a");
        assert_eq!(rest.tagged, vec!["b"]);
        assert_eq!(rest.skip, None);
        assert_eq!(rest.limit, Some(3));
    }
}
