// src/search.rs
//! Feed-backed site search.
//!
//! A session downloads `{site}/feed` the first time it is opened and keeps
//! the items for its lifetime. Queries are plain substring matches over
//! titles and descriptions.

use crate::feed::{parse_feed, FeedItem};
use crate::remote::RemoteFetcher;

/// Keys the search dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// What the host should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Navigate(String),
    Close,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    feed_url: String,
    items: Vec<FeedItem>,
    results: Vec<FeedItem>,
    selected: usize,
    visible: bool,
    fetched: bool,
}

impl SearchSession {
    pub fn new(site: &str) -> Self {
        Self {
            feed_url: format!("{}/feed", site.trim_end_matches('/')),
            items: Vec::new(),
            results: Vec::new(),
            selected: 0,
            visible: false,
            fetched: false,
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Shows the dialog, loading the feed unless it is already loaded.
    ///
    /// A failed download is logged and leaves the item list empty; the
    /// next `open` tries again.
    pub async fn open(&mut self, fetcher: &dyn RemoteFetcher) {
        self.visible = true;
        if self.fetched {
            return;
        }

        let items = match fetcher.fetch_text(&self.feed_url, None).await {
            Ok(body) => parse_feed(&body),
            Err(e) => Err(e),
        };

        match items {
            Ok(items) => {
                log::debug!("Search loaded {} feed items", items.len());
                self.results = items.clone();
                self.items = items;
                self.selected = 0;
                self.fetched = true;
            }
            Err(e) => log::error!("Error fetching feed {}: {}", self.feed_url, e),
        }
    }

    /// Narrows the results to items matching `query`.
    ///
    /// An empty (after trimming) query shows every item. Matching is case
    /// sensitive and keeps feed order. The selection returns to the first
    /// result.
    pub fn filter(&mut self, query: &str) -> &[FeedItem] {
        let query = query.trim();
        self.results = if query.is_empty() {
            self.items.clone()
        } else {
            self.items
                .iter()
                .filter(|item| {
                    item.title.contains(query)
                        || item
                            .description
                            .as_deref()
                            .is_some_and(|d| d.contains(query))
                })
                .cloned()
                .collect()
        };
        self.selected = 0;
        &self.results
    }

    pub fn handle_key(&mut self, key: SearchKey) -> Option<SearchAction> {
        if !self.visible {
            return None;
        }

        let count = self.results.len();
        match key {
            SearchKey::Up => {
                if count > 0 {
                    self.selected = if self.selected > 0 { self.selected - 1 } else { count - 1 };
                }
                None
            }
            SearchKey::Down => {
                if count > 0 {
                    self.selected = if self.selected + 1 < count { self.selected + 1 } else { 0 };
                }
                None
            }
            SearchKey::Enter => self
                .selected_item()
                .filter(|item| !item.link.is_empty())
                .map(|item| SearchAction::Navigate(item.link.clone())),
            SearchKey::Escape => {
                self.visible = false;
                Some(SearchAction::Close)
            }
        }
    }

    pub fn results(&self) -> &[FeedItem] {
        &self.results
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.results.get(self.selected)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
