use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::api_client::{ApiClient, PostQuery};
use crate::config::SearchConfig;
use crate::Post;

// Page size and ordering are fixed per controller, so (page, committed
// search) identifies a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub page: u32,
    pub search: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    Idle,
    Debouncing,
    Committed,
    Fetching,
    Loaded,
    NoResults,
    Errored(String),
}

impl SearchPhase {
    pub fn label(&self) -> &'static str {
        match self {
            SearchPhase::Idle => "idle",
            SearchPhase::Debouncing => "debouncing",
            SearchPhase::Committed => "committed",
            SearchPhase::Fetching => "fetching",
            SearchPhase::Loaded => "loaded",
            SearchPhase::NoResults => "no-results",
            SearchPhase::Errored(_) => "errored",
        }
    }
}

// A newer input invalidates every older handle, so at most one pending
// commit can ever land.
#[derive(Debug, Clone)]
pub struct PendingCommit {
    generation: u64,
    text: String,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct FetchTicket {
    key: QueryKey,
    query: PostQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &PostQuery {
        &self.query
    }
}

#[derive(Debug)]
pub enum FetchPlan {
    Cached(Vec<Post>),
    Fetch(FetchTicket),
}

struct CachedPage {
    posts: Vec<Post>,
    fetched_at: Instant,
}

pub struct SearchController {
    raw_input: String,
    committed_search: String,
    page: u32,
    page_size: u32,
    order_by: String,
    debounce: Duration,
    freshness: Duration,
    generation: u64,
    phase: SearchPhase,
    cache: HashMap<QueryKey, CachedPage>,
}

impl SearchController {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            raw_input: String::new(),
            committed_search: String::new(),
            page: 1,
            page_size: config.page_size.max(1),
            order_by: config.order_by.clone(),
            debounce: Duration::from_millis(config.debounce_ms),
            freshness: Duration::from_secs(config.cache_freshness_secs),
            generation: 0,
            phase: SearchPhase::Idle,
            cache: HashMap::new(),
        }
    }

    pub fn on_input_change(&mut self, text: &str) -> PendingCommit {
        self.raw_input = text.to_string();
        self.generation += 1;
        self.phase = SearchPhase::Debouncing;
        PendingCommit {
            generation: self.generation,
            text: text.to_string(),
            delay: self.debounce,
        }
    }

    // The page resets to 1 only when the committed value actually changed.
    pub fn commit(&mut self, pending: PendingCommit) -> bool {
        if pending.generation != self.generation {
            debug!(text = %pending.text, "debounce commit superseded");
            return false;
        }
        if pending.text != self.committed_search {
            self.committed_search = pending.text;
            self.page = 1;
        }
        self.phase = SearchPhase::Committed;
        true
    }

    // Clamped to a minimum of 1; never touches the committed search.
    pub fn on_page_change(&mut self, delta: i64) {
        let next = self.page as i64 + delta;
        self.page = next.max(1) as u32;
        self.phase = SearchPhase::Committed;
    }

    pub fn current_query(&self) -> PostQuery {
        PostQuery {
            page: self.page,
            page_size: self.page_size,
            order_by: self.order_by.clone(),
            search: self.committed_search.clone(),
        }
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey {
            page: self.page,
            search: self.committed_search.clone(),
        }
    }

    // Serves a fresh cached page without a fetch, otherwise hands out a
    // ticket for the current key.
    pub fn begin_fetch(&mut self) -> FetchPlan {
        let key = self.query_key();
        if let Some(cached) = self.cache.get(&key) {
            if cached.fetched_at.elapsed() < self.freshness {
                debug!(page = key.page, search = %key.search, "serving cached page");
                self.phase = if cached.posts.is_empty() {
                    SearchPhase::NoResults
                } else {
                    SearchPhase::Loaded
                };
                return FetchPlan::Cached(cached.posts.clone());
            }
        }
        self.phase = SearchPhase::Fetching;
        FetchPlan::Fetch(FetchTicket {
            key,
            query: self.current_query(),
        })
    }

    // Returns false when the key changed while the request was in flight;
    // stale responses never touch state.
    pub fn apply_result(&mut self, ticket: &FetchTicket, result: Result<Vec<Post>, String>) -> bool {
        if ticket.key != self.query_key() {
            debug!(
                page = ticket.key.page,
                search = %ticket.key.search,
                "dropping stale fetch result"
            );
            return false;
        }
        match result {
            Ok(posts) => {
                self.phase = if posts.is_empty() {
                    SearchPhase::NoResults
                } else {
                    SearchPhase::Loaded
                };
                let freshness = self.freshness;
                self.cache
                    .retain(|_, cached| cached.fetched_at.elapsed() < freshness);
                self.cache.insert(
                    ticket.key.clone(),
                    CachedPage {
                        posts,
                        fetched_at: Instant::now(),
                    },
                );
            }
            Err(message) => {
                self.phase = SearchPhase::Errored(message);
            }
        }
        true
    }

    pub fn current_page(&self) -> Option<&[Post]> {
        self.cache
            .get(&self.query_key())
            .map(|cached| cached.posts.as_slice())
    }

    // A short page means there is no next page.
    pub fn last_page_reached(&self) -> bool {
        self.current_page()
            .map(|posts| (posts.len() as u32) < self.page_size)
            .unwrap_or(false)
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn committed_search(&self) -> &str {
        &self.committed_search
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }
}

// Dropping an in-progress `input` future cancels the pending commit; the
// generation check covers the path where it is polled to completion late.
pub struct SearchSession {
    controller: SearchController,
    client: ApiClient,
}

impl SearchSession {
    pub fn new(client: ApiClient, config: &SearchConfig) -> Self {
        Self {
            controller: SearchController::new(config),
            client,
        }
    }

    // Resolves to None when a newer keystroke superseded this one before
    // the quiet interval elapsed.
    pub async fn input(&mut self, text: &str) -> Result<Option<Vec<Post>>, String> {
        let pending = self.controller.on_input_change(text);
        tokio::time::sleep(pending.delay).await;
        if !self.controller.commit(pending) {
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }

    pub async fn next_page(&mut self) -> Result<Vec<Post>, String> {
        self.controller.on_page_change(1);
        self.refresh().await
    }

    pub async fn previous_page(&mut self) -> Result<Vec<Post>, String> {
        self.controller.on_page_change(-1);
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<Vec<Post>, String> {
        match self.controller.begin_fetch() {
            FetchPlan::Cached(posts) => Ok(posts),
            FetchPlan::Fetch(ticket) => {
                let result = self.client.posts(ticket.query()).await;
                self.controller.apply_result(&ticket, result);
                match self.controller.phase() {
                    SearchPhase::Errored(message) => Err(message.clone()),
                    _ => Ok(self
                        .controller
                        .current_page()
                        .map(|posts| posts.to_vec())
                        .unwrap_or_default()),
                }
            }
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }
}
