//! Markdown to HTML rendering for topic bodies.
//!
//! Rendering is a single pass over the `pulldown-cmark` event stream with two
//! adjustments before the HTML writer sees the events:
//!
//! - link targets go through a [`TargetRewriter`] (relative images are
//!   resolved against the topic's own folder)
//! - headings without an explicit `{#id}` get an anchor derived from their text

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use std::collections::HashMap;

/// Prefix marking an image as relative to the topic folder.
const TOPIC_RELATIVE: &str = "./";

/// Anchor used for headings without any alphanumeric text.
const FALLBACK_ANCHOR: &str = "section";

// ============================================================================
// Target Rewriting
// ============================================================================

/// Kind of document node carrying a target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Image,
    Link,
}

/// Rewrites link and image targets while rendering.
///
/// Implementations must be pure: no IO, no existence checks.
pub trait TargetRewriter {
    /// Return the new target, or `None` to keep it unchanged.
    fn rewrite(&self, kind: NodeKind, target: &str) -> Option<String>;
}

/// Resolves `./`-prefixed images against a topic's asset folder.
#[derive(Debug, Clone, Copy)]
pub struct TopicAssets<'a> {
    slug: &'a str,
}

impl<'a> TopicAssets<'a> {
    pub const fn new(slug: &'a str) -> Self {
        Self { slug }
    }
}

impl TargetRewriter for TopicAssets<'_> {
    fn rewrite(&self, kind: NodeKind, target: &str) -> Option<String> {
        rewrite_target(self.slug, kind, target)
    }
}

/// `./img.png` on topic `widgets` becomes `widgets/img.png`.
///
/// Only images are touched; absolute URLs and other relative paths
/// (including `../`) are left alone.
pub fn rewrite_target(slug: &str, kind: NodeKind, target: &str) -> Option<String> {
    match kind {
        NodeKind::Image => target
            .strip_prefix(TOPIC_RELATIVE)
            .map(|rest| format!("{slug}/{rest}")),
        NodeKind::Link => None,
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Markdown dialect used for topics.
fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render a topic body to an HTML fragment.
pub fn render(body: &str, slug: &str) -> String {
    render_with(body, &TopicAssets::new(slug))
}

/// Render markdown, passing every link and image target through `rewriter`.
pub fn render_with(body: &str, rewriter: &dyn TargetRewriter) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(body, options())
        .map(|event| rewrite_event(event, rewriter))
        .collect();
    assign_heading_ids(&mut events);

    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn rewrite_event<'a>(event: Event<'a>, rewriter: &dyn TargetRewriter) -> Event<'a> {
    match event {
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = rewrite_url(dest_url, NodeKind::Image, rewriter);
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = rewrite_url(dest_url, NodeKind::Link, rewriter);
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        other => other,
    }
}

fn rewrite_url<'a>(url: CowStr<'a>, kind: NodeKind, rewriter: &dyn TargetRewriter) -> CowStr<'a> {
    match rewriter.rewrite(kind, &url) {
        Some(new) => CowStr::from(new),
        None => url,
    }
}

// ============================================================================
// Heading Anchors
// ============================================================================

/// Give every heading an `id`, keeping explicit ones and de-duplicating the rest.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for i in 0..events.len() {
        let Event::Start(Tag::Heading { id, .. }) = &events[i] else {
            continue;
        };

        if let Some(explicit) = id {
            seen.entry(explicit.to_string()).or_insert(0);
            continue;
        }

        let anchor = unique_anchor(&mut seen, anchor_for(&heading_text(&events[i + 1..])));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
    }
}

/// Plain text of a heading, up to its closing tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Lowercase alphanumerics; every other run of characters becomes one `-`.
fn anchor_for(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_dash = false;
            anchor.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if anchor.is_empty() {
        FALLBACK_ANCHOR.to_owned()
    } else {
        anchor
    }
}

fn unique_anchor(seen: &mut HashMap<String, usize>, base: String) -> String {
    let Some(&used) = seen.get(&base) else {
        seen.insert(base.clone(), 0);
        return base;
    };

    let mut n = used;
    let anchor = loop {
        n += 1;
        let candidate = format!("{base}-{n}");
        if !seen.contains_key(&candidate) {
            break candidate;
        }
    };
    seen.insert(base, n);
    seen.insert(anchor.clone(), 0);
    anchor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_target_relative_image() {
        assert_eq!(
            rewrite_target("widgets", NodeKind::Image, "./img.png"),
            Some("widgets/img.png".to_string())
        );
        assert_eq!(
            rewrite_target("widgets", NodeKind::Image, "./shots/a b.png"),
            Some("widgets/shots/a b.png".to_string())
        );
    }

    #[test]
    fn test_rewrite_target_leaves_others() {
        assert_eq!(rewrite_target("w", NodeKind::Image, "http://x/y.png"), None);
        assert_eq!(rewrite_target("w", NodeKind::Image, "../img.png"), None);
        assert_eq!(rewrite_target("w", NodeKind::Image, "img.png"), None);
        assert_eq!(rewrite_target("w", NodeKind::Image, "/img.png"), None);
        assert_eq!(rewrite_target("w", NodeKind::Link, "./other"), None);
    }

    #[test]
    fn test_render_rewrites_relative_image() {
        let html = render("![alt](./img.png)", "widgets");
        assert!(html.contains(r#"src="widgets/img.png""#), "{html}");
        assert!(html.contains(r#"alt="alt""#), "{html}");
    }

    #[test]
    fn test_render_keeps_absolute_image() {
        let html = render("![alt](http://x/y.png)", "widgets");
        assert!(html.contains(r#"src="http://x/y.png""#), "{html}");
    }

    #[test]
    fn test_render_keeps_parent_relative_image() {
        let html = render("![alt](../img.png)", "widgets");
        assert!(html.contains(r#"src="../img.png""#), "{html}");
    }

    #[test]
    fn test_render_leaves_links_alone() {
        let html = render("[next](./next-topic)", "widgets");
        assert!(html.contains(r#"href="./next-topic""#), "{html}");
    }

    #[test]
    fn test_render_reference_style_image() {
        let html = render("![logo][l]\n\n[l]: ./logo.svg\n", "brand");
        assert!(html.contains(r#"src="brand/logo.svg""#), "{html}");
    }

    #[test]
    fn test_render_with_custom_rewriter() {
        struct Cdn;
        impl TargetRewriter for Cdn {
            fn rewrite(&self, kind: NodeKind, target: &str) -> Option<String> {
                (kind == NodeKind::Link).then(|| format!("https://cdn.test/{target}"))
            }
        }

        let html = render_with("[a](b) ![c](./d.png)", &Cdn);
        assert!(html.contains(r#"href="https://cdn.test/b""#), "{html}");
        assert!(html.contains(r#"src="./d.png""#), "{html}");
    }

    #[test]
    fn test_heading_anchors() {
        let html = render("# Hello World\n\n## Setup & `config`!\n", "t");
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#), "{html}");
        assert!(html.contains(r#"<h2 id="setup-config">"#), "{html}");
    }

    #[test]
    fn test_heading_anchors_deduplicated() {
        let html = render("# Usage\n\n# Usage\n\n# Usage\n", "t");
        assert!(html.contains(r#"id="usage""#), "{html}");
        assert!(html.contains(r#"id="usage-1""#), "{html}");
        assert!(html.contains(r#"id="usage-2""#), "{html}");
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let html = render("# Intro {#start}\n\n# Start\n", "t");
        assert!(html.contains(r#"id="start""#), "{html}");
        assert!(html.contains(r#"id="start-1""#), "{html}");
    }

    #[test]
    fn test_anchor_for() {
        assert_eq!(anchor_for("  Hello,   World  "), "hello-world");
        assert_eq!(anchor_for("Ünïcode Títle"), "ünïcode-títle");
        assert_eq!(anchor_for("!!!"), FALLBACK_ANCHOR);
    }

    #[test]
    fn test_common_extensions() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n", "t");
        assert!(html.contains("<table>"), "{html}");
        assert!(html.contains("<del>gone</del>"), "{html}");
        assert!(html.contains(r#"type="checkbox""#), "{html}");
    }
}
