//! # Ranking Service
//!
//! Serves leaderboard pages through the bounded ranking cache. Every cache
//! entry holds the pages fetched so far for one (view, search) pair; loading
//! more pages adds to the entry without restarting its TTL, so the whole
//! entry goes stale at once and a scrolled list never mixes old and new
//! data.
//!
//! Interactive searches go through a per-client debouncer, and a superseded
//! search returns `None` instead of a page.

use shared::{RankingPage, RankingView};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::ranking_cache::{RankingCache, RankingCacheKey};
use crate::domain::search::{SearchOutcome, SearchSessions};
use crate::error::{PortalError, PortalResult};
use crate::storage::RankingSource;

/// Client id used when a search request does not name one
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// Pages loaded so far for one cache key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingSnapshot {
    pub pages: BTreeMap<u32, RankingPage>,
}

#[derive(Clone)]
pub struct RankingService {
    source: Arc<dyn RankingSource>,
    cache: Arc<RankingCache<RankingSnapshot>>,
    searches: Arc<SearchSessions>,
    page_size: u32,
}

impl RankingService {
    pub fn new(
        source: Arc<dyn RankingSource>,
        cache: Arc<RankingCache<RankingSnapshot>>,
        searches: Arc<SearchSessions>,
        page_size: u32,
    ) -> Self {
        Self {
            source,
            cache,
            searches,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn cache(&self) -> &RankingCache<RankingSnapshot> {
        &self.cache
    }

    /// One page of the ranking, from the cache when the entry is fresh
    pub async fn page(&self, view: RankingView, search: &str, page: u32) -> PortalResult<RankingPage> {
        if page == 0 {
            return Err(PortalError::invalid_input("Pages start at 1"));
        }

        let key = RankingCacheKey::new(view, search);
        if let Some(cached) = self
            .cache
            .get(&key)
            .and_then(|snapshot| snapshot.pages.get(&page).cloned())
        {
            debug!("Ranking cache hit: {} '{}' page {}", view, key.search, page);
            return Ok(cached);
        }

        debug!("Ranking cache miss: {} '{}' page {}", view, key.search, page);
        let fetched = self
            .source
            .fetch_ranking(view, &key.search, page, self.page_size)
            .await?;

        let stored = fetched.clone();
        self.cache.upsert_with(key, RankingSnapshot::default, move |snapshot| {
            snapshot.pages.insert(page, stored);
        });

        Ok(fetched)
    }

    /// Drop the cached entry and load the first page again
    pub async fn refresh(&self, view: RankingView, search: &str) -> PortalResult<RankingPage> {
        let key = RankingCacheKey::new(view, search);
        if self.cache.invalidate(&key) {
            info!("Ranking cache entry dropped for refresh: {} '{}'", view, key.search);
        }
        self.page(view, search, 1).await
    }

    /// Debounced first-page search for one client. `Ok(None)` means a newer
    /// search from the same client replaced this one.
    pub async fn search(
        &self,
        client_id: &str,
        view: RankingView,
        term: &str,
    ) -> PortalResult<Option<RankingPage>> {
        let client_id = match client_id.trim() {
            "" => ANONYMOUS_CLIENT,
            trimmed => trimmed,
        };
        let debouncer = self.searches.session(client_id);

        match debouncer.run(|| self.page(view, term, 1)).await {
            SearchOutcome::Fresh(result) => result.map(Some),
            SearchOutcome::Superseded => {
                debug!("Search '{}' from '{}' was superseded", term, client_id);
                Ok(None)
            }
        }
    }
}
