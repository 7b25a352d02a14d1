//! Post listing: per-page row extraction and the pagination loop.
//!
//! The browser side only reports what each row structurally contained
//! ([`RawRow`]); everything else here is plain logic over those values, so the
//! stopping rules can be tested without a browser.

use crate::browser::BrowserError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Title orbi.kr shows for a post the author already removed. Rows with this
/// exact title are excluded from the listing.
pub const DELETED_SENTINEL: &str = "회원에 의해 삭제된 글입니다.";

/// One of the user's posts, as scraped from a listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// Trailing path segment of the row's anchor href. Opaque; only used to
    /// address the post's modify page.
    pub id: String,
}

/// What one `ul.post-list > li` row structurally yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    /// The title element was present. Its text and the row's href may still be
    /// empty or missing.
    Intact {
        title: String,
        href: Option<String>,
    },
    /// The title element was structurally absent from the row markup.
    MissingTitle,
}

/// One fetched listing page, before row extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPage {
    /// The `.post-list` container was present. Zero rows is legitimate.
    Rows(Vec<RawRow>),
    /// The container never appeared within the wait window.
    MissingContainer,
}

/// Outcome of scraping one page's rows.
///
/// A page with zero rows is `Continue(vec![])`; pagination keeps going. A row
/// whose title element is structurally absent means the page layout no longer
/// matches real content, so the whole page is discarded and pagination halts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Continue(Vec<Post>),
    Stop,
}

/// Produces one page of raw listing rows. Implemented by the browser-backed
/// forum client; tests substitute a canned source.
#[async_trait]
pub trait ListingSource {
    /// Fetch listing page `page` (1-based). `Err` means the page itself failed
    /// to load, which halts pagination.
    async fn fetch_rows(&self, page: u32) -> Result<ListingPage, BrowserError>;
}

/// Derive a post identifier from an anchor href: its last `/`-separated
/// segment, or `None` when that segment is empty.
pub fn post_id_from_href(href: &str) -> Option<String> {
    let id = href.rsplit('/').next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Extract posts from one page's rows.
pub fn scrape_page(rows: &[RawRow]) -> PageOutcome {
    let mut posts = Vec::new();

    for row in rows {
        let (title, href) = match row {
            RawRow::Intact { title, href } => (title.trim(), href),
            RawRow::MissingTitle => return PageOutcome::Stop,
        };

        if title.is_empty() || title == DELETED_SENTINEL {
            continue;
        }

        let Some(id) = href.as_deref().and_then(post_id_from_href) else {
            continue;
        };

        posts.push(Post {
            title: title.to_string(),
            id,
        });
    }

    PageOutcome::Continue(posts)
}

/// Walk listing pages from page 1 and accumulate every non-sentinel post, in
/// page-then-row order.
///
/// Three things halt the walk, each returning whatever accumulated so far:
/// a page that fails to load, a page without the listing container, and a row
/// structurally missing its title element (the halting page contributes
/// nothing). A page with zero rows is not one of them.
pub async fn collect_posts<S: ListingSource + ?Sized>(source: &S) -> Vec<Post> {
    let mut posts = Vec::new();
    let mut page = 1u32;

    loop {
        tracing::info!(page, "fetching listing page");

        let fetched = match source.fetch_rows(page).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(page, error = %e, "listing page failed to load, stopping");
                break;
            }
        };

        let rows = match fetched {
            ListingPage::Rows(rows) => rows,
            ListingPage::MissingContainer => {
                tracing::error!(page, "post list container not found, stopping");
                break;
            }
        };

        if rows.is_empty() {
            tracing::info!(page, "no rows on this page, trying the next one");
        }

        match scrape_page(&rows) {
            PageOutcome::Continue(mut found) => posts.append(&mut found),
            PageOutcome::Stop => {
                tracing::warn!(page, "row is missing its title element, treating as end of content");
                break;
            }
        }

        page += 1;
    }

    tracing::info!(count = posts.len(), "listing complete");
    posts
}

/// Write the listing to `path` as pretty-printed JSON, as a record of what
/// existed before a sweep.
pub fn export_json(path: &Path, posts: &[Post]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(posts)?;
    std::fs::write(path, json)
}
