//! `pubfeed feed -f pages.json` — scroll a paged activity feed and render it.
//!
//! The fixture is a JSON array of pages, each `{ "data": [...], "next": "..." }`.
//! Scrolling is simulated by requesting one page at a time while the
//! sentinel stays hidden, so a page limit is never overshot.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use pubfeed_feed::{FeedController, FeedEntry, FeedLoaderState, FeedPage, Sentinel, StaticPages};
use pubfeed_format::{
    Catalog, Member, RelativeTimeFormatter, Translate, Vars, member_initials, member_name,
};

use crate::config::FeedConfig;

/// One activity in a fixture page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// `None` when the author's account was deleted.
    #[serde(default)]
    pub actor: Option<Member>,
    #[serde(default)]
    pub content: String,
    pub published: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(default)]
    pub reply_count: i64,
}

impl FeedEntry for Activity {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_reply(&self) -> bool {
        self.in_reply_to.is_some()
    }
}

/// A rendered feed line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: String,
    pub initials: String,
    pub author: String,
    pub when: String,
    pub content: String,
    pub replies: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedOutput {
    rows: Vec<Row>,
    pages_loaded: usize,
    state: FeedLoaderState,
}

pub struct FeedArgs<'a> {
    pub file: &'a Path,
    pub now: Option<&'a str>,
    pub include_replies: bool,
    pub max_pages: Option<usize>,
    pub json: bool,
}

pub async fn run(args: FeedArgs<'_>, config: &FeedConfig) -> Result<()> {
    let now = super::resolve_now(args.now)?;
    let formatter = config.formatter()?;
    let catalog = Catalog::new(&config.locale);
    let hide_replies = config.hide_replies && !args.include_replies;

    let pages = load_pages(args.file)?;
    let feed = scroll(pages, args.max_pages).await?;

    let shown: Vec<&Activity> = feed
        .entries
        .iter()
        .filter(|a| !(hide_replies && a.is_reply()))
        .collect();
    let rows = render_rows(&shown, now, &formatter, &catalog);

    if args.json {
        let out = FeedOutput {
            rows,
            pages_loaded: feed.pages_loaded,
            state: feed.state,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for row in &rows {
        println!("{:>2}  {}  ·  {}", row.initials, row.author, row.when);
        if !row.content.is_empty() {
            println!("    {}", row.content);
        }
        println!("    {}", row.replies);
    }
    if !feed.state.has_next_page {
        println!("{}", catalog.t("No more posts", None));
    }
    Ok(())
}

/// Read a JSON fixture of pages.
pub fn load_pages(path: &Path) -> Result<Vec<FeedPage<Activity>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let pages: Vec<FeedPage<Activity>> = serde_json::from_str(&content)
        .with_context(|| format!("invalid feed fixture {}", path.display()))?;
    Ok(pages)
}

/// What was loaded by [`scroll`].
pub struct Scrolled {
    pub entries: Vec<Activity>,
    pub pages_loaded: usize,
    pub state: FeedLoaderState,
}

/// Scroll through `pages`, one trigger per page, until the feed is
/// exhausted or `max_pages` pages are loaded.
///
/// The sentinel is never shown: a visible sentinel would chain the next
/// page as soon as one lands.
pub async fn scroll(pages: Vec<FeedPage<Activity>>, max_pages: Option<usize>) -> Result<Scrolled> {
    let sentinel = Arc::new(Sentinel::new());
    let feed = FeedController::new(StaticPages::from_pages(pages), sentinel)?;

    loop {
        let (state, loaded) = feed.with_loader(|l| (l.state(), l.pages_loaded()));
        if !state.has_next_page || max_pages.is_some_and(|max| loaded >= max) {
            break;
        }
        feed.trigger();
        feed.wait_idle().await;
        if let Some(err) = feed.last_error() {
            return Err(err).context("feed stopped scrolling");
        }
    }

    let scrolled = feed.with_loader(|l| Scrolled {
        entries: l.entries().to_vec(),
        pages_loaded: l.pages_loaded(),
        state: l.state(),
    });
    info!(
        entries = scrolled.entries.len(),
        pages = scrolled.pages_loaded,
        "feed scrolled"
    );
    feed.teardown();
    Ok(scrolled)
}

/// Render activities for display.
pub fn render_rows(
    activities: &[&Activity],
    now: DateTime<Utc>,
    formatter: &RelativeTimeFormatter,
    catalog: &Catalog,
) -> Vec<Row> {
    activities
        .iter()
        .map(|a| Row {
            id: a.id.clone(),
            initials: member_initials(a.actor.as_ref(), catalog),
            author: member_name(a.actor.as_ref(), catalog),
            when: formatter.format(a.published, now, catalog),
            content: a.content.clone(),
            replies: catalog.t("{{amount}} replies", Some(Vars::amount(a.reply_count))),
        })
        .collect()
}
