//! HTTP server for the help center.
//!
//! This module provides a small HTTP server built on `tiny_http`:
//!
//! - Topic listing with tag filters and pagination
//! - Single topic pages, read fresh from disk on every request
//! - Site-wide assets (`/css/...`) and per-topic assets
//! - Graceful shutdown on Ctrl+C
//!
//! # Routes
//!
//! | Path               | Method     | Handler                                  |
//! |--------------------|------------|------------------------------------------|
//! | `/`, `/index`      | GET, HEAD  | listing (`tagged`, `skip`, `limit`)      |
//! | `/css*`            | GET, HEAD  | file under `[paths] assets`              |
//! | `/{name}`          | GET, HEAD  | topic page                               |
//! | `/{topic}/{asset}` | GET, HEAD  | file under `[paths] pages`/`{topic}`     |
//!
//! Failures answer with a short fixed message; the error itself only goes
//! to the [`ErrorHandler`].

use crate::{
    config::SiteConfig,
    error::TopicError,
    index::{IndexBuilder, IndexCache, ListingQuery, Pagination, index_cache},
    log,
    topic::TopicStore,
    views::{IndexPageData, STYLESHEET, STYLESHEET_PATH, TopicPageData, Views},
};
use anyhow::{Context, Result};
use std::{
    fs, io,
    net::{IpAddr, SocketAddr},
    path::Path,
    sync::Arc,
};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

const NOT_FOUND: &str = "Not found";
const INDEX_FAILED: &str = "Problem serving help index";
const TOPIC_FAILED: &str = "Problem serving help topic";
const ASSET_FAILED: &str = "Problem serving help asset";
const TOPIC_ASSET_FAILED: &str = "Problem serving help topic asset";

/// Receives every failed request: `(url, status code, client message, error)`.
pub type ErrorHandler = Arc<dyn Fn(&str, u16, &str, &anyhow::Error) + Send + Sync>;

/// Logs the full error chain.
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|url: &str, code: u16, message: &str, err: &anyhow::Error| {
        log!("error"; "{code} {message}: {url}\n{err:#}");
    })
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the help server.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Enters the main request handling loop
///
/// The server blocks until Ctrl+C is received.
pub fn serve_site(config: Arc<SiteConfig>) -> Result<()> {
    let interface: IpAddr = config.serve.interface.parse()?;
    let help = HelpServer::new(Arc::clone(&config), None)?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    if config.config_path.is_file() {
        log!("serve"; "using {}", config.config_path.display());
    }
    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(&help, request) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn handle_request(help: &HelpServer, request: Request) -> Result<()> {
    let reply = help.respond(request.method(), request.url());
    request.respond(reply.into_response())?;
    Ok(())
}

// ============================================================================
// Routing
// ============================================================================

/// Where a decoded request path leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Index,
    /// Path below the assets directory, starting with `css`.
    SiteAsset(&'a str),
    Topic(&'a str),
    TopicAsset { topic: &'a str, asset: &'a str },
    NotFound,
}

/// Map a percent-decoded path (without query) to a route.
///
/// Paths with empty, `.` or `..` segments, or backslashes, never match.
pub fn route(path: &str) -> Route<'_> {
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() || path == "index" {
        return Route::Index;
    }
    if !path.split('/').all(is_safe_segment) {
        return Route::NotFound;
    }
    if path.starts_with("css") {
        return Route::SiteAsset(path);
    }

    let mut segments = path.split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(name), None, None) => Route::Topic(name),
        (Some(topic), Some(asset), None) => Route::TopicAsset { topic, asset },
        _ => Route::NotFound,
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

// ============================================================================
// Handlers
// ============================================================================

/// Request handling state shared by all requests.
pub struct HelpServer {
    config: Arc<SiteConfig>,
    store: TopicStore,
    index: Box<dyn IndexCache>,
    views: Views,
    on_error: ErrorHandler,
}

impl HelpServer {
    /// `on_error` replaces the default (logging) error handler.
    pub fn new(config: Arc<SiteConfig>, on_error: Option<ErrorHandler>) -> Result<Self> {
        let store = TopicStore::from_config(&config);
        let index = index_cache(IndexBuilder::new(store.clone()), config.listing.cache);
        let views = Views::load(&config.paths.views)?;

        Ok(Self {
            config,
            store,
            index,
            views,
            on_error: on_error.unwrap_or_else(default_error_handler),
        })
    }

    /// Answer one request.
    pub fn respond(&self, method: &Method, url: &str) -> Reply {
        if !matches!(method, Method::Get | Method::Head) {
            return Reply::text(405, "Method not allowed");
        }

        let (raw_path, query) = url.split_once('?').unwrap_or((url, ""));
        let Ok(path) = urlencoding::decode(raw_path) else {
            return Reply::text(404, NOT_FOUND);
        };

        let target = route(&path);
        let (result, message) = match target {
            Route::Index => (self.serve_index(query), INDEX_FAILED),
            Route::SiteAsset(asset) => (self.serve_site_asset(asset), ASSET_FAILED),
            Route::Topic(name) => (self.serve_topic(name), TOPIC_FAILED),
            Route::TopicAsset { topic, asset } => {
                (self.serve_topic_asset(topic, asset), TOPIC_ASSET_FAILED)
            }
            Route::NotFound => return Reply::text(404, NOT_FOUND),
        };

        result.unwrap_or_else(|err| {
            // A missing topic file breaks the index; the listing itself exists.
            let code = match target {
                Route::Index => 500,
                _ => status_for(&err),
            };
            let message = if code == 404 { NOT_FOUND } else { message };
            (self.on_error)(url, code, message, &err);
            Reply::text(code, message)
        })
    }

    fn serve_index(&self, query: &str) -> Result<Reply> {
        let index = self.index.get_or_build()?;
        let query = ListingQuery::parse(query);
        let listing = &self.config.listing;

        let mut pagination = Pagination::from_query(&query, listing.page_size, listing.slice);
        let page = index.filter_to_tags(&query.tagged).paginate(&mut pagination);

        let html = self.views.render_index(&IndexPageData {
            title: &self.config.site.title,
            description: &self.config.site.description,
            topics: &page,
            active_filters: &query.tagged,
            pagination: &pagination,
            query: &query,
        });
        Ok(Reply::html(html))
    }

    fn serve_topic(&self, name: &str) -> Result<Reply> {
        let topic = self.store.hydrate(name)?;
        let html = self.views.render_topic(&TopicPageData { topic: &topic });
        Ok(Reply::html(html))
    }

    fn serve_site_asset(&self, asset: &str) -> Result<Reply> {
        let path = self.config.paths.assets.join(asset);
        if !path.is_file() && asset == STYLESHEET_PATH {
            return Ok(Reply {
                status: 200,
                content_type: guess_content_type(&path),
                body: STYLESHEET.as_bytes().to_vec(),
            });
        }
        Reply::file(&path)
    }

    fn serve_topic_asset(&self, topic: &str, asset: &str) -> Result<Reply> {
        Reply::file(&self.store.asset_path(topic, asset))
    }
}

/// 404 when the error means the resource does not exist, 500 otherwise.
fn status_for(err: &anyhow::Error) -> u16 {
    if let Some(err) = err.downcast_ref::<TopicError>() {
        return err.status_code();
    }
    match err.downcast_ref::<io::Error>() {
        Some(err) if err.kind() == io::ErrorKind::NotFound => 404,
        _ => 500,
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

/// A fully built response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    /// Serve HTML content.
    fn html(content: String) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: content.into_bytes(),
        }
    }

    /// Serve a short plain-text message.
    fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: message.as_bytes().to_vec(),
        }
    }

    /// Serve a file with appropriate content type.
    fn file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("`{}` is not a file", path.display()),
            )
            .into());
        }

        let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self {
            status: 200,
            content_type: guess_content_type(path),
            body,
        })
    }

    #[cfg(test)]
    fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }

    fn into_response(self) -> Response<io::Cursor<Vec<u8>>> {
        let response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        match Header::from_bytes("Content-Type", self.content_type) {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Tests
// ============================================================================
