//! Debounced search with generation stamping.
//!
//! Every submission takes a new generation number and waits out the
//! debounce delay. A submission only fetches if nothing newer arrived during
//! the delay, and its result is only delivered if nothing newer arrived
//! while it was in flight. Last write wins; a stale response can never
//! overwrite a newer one.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    /// Result of the most recent submission
    Fresh(T),
    /// A newer submission (or a cancel) replaced this one
    Superseded,
}

impl<T> SearchOutcome<T> {
    pub fn into_fresh(self) -> Option<T> {
        match self {
            SearchOutcome::Fresh(value) => Some(value),
            SearchOutcome::Superseded => None,
        }
    }
}

#[derive(Debug)]
pub struct SearchDebouncer {
    generation: AtomicU64,
    delay: Duration,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: AtomicU64::new(0),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Supersede every submission currently waiting or in flight
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Debounce `fetch` against every other submission on this debouncer
    pub async fn run<F, Fut, T>(&self, fetch: F) -> SearchOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let stamp = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;
        if self.current_generation() != stamp {
            debug!("Search generation {} superseded before fetching", stamp);
            return SearchOutcome::Superseded;
        }

        let result = fetch().await;
        if self.current_generation() != stamp {
            debug!("Search generation {} superseded while in flight", stamp);
            return SearchOutcome::Superseded;
        }

        SearchOutcome::Fresh(result)
    }
}

/// One debouncer per client, so one user's typing never supersedes
/// another's.
///
/// Holds at most `max_sessions` sessions. When full, idle sessions (no
/// search waiting or in flight) are dropped first; if none is idle, the
/// least recently used session is evicted. Searches already running on an
/// evicted debouncer still complete against it.
#[derive(Debug)]
pub struct SearchSessions {
    state: Mutex<SessionTable>,
    delay: Duration,
    max_sessions: usize,
}

#[derive(Debug, Default)]
struct SessionTable {
    sessions: HashMap<String, Session>,
    /// Bumped on every lookup; orders sessions by last use
    clock: u64,
}

#[derive(Debug)]
struct Session {
    debouncer: Arc<SearchDebouncer>,
    last_used: u64,
}

impl SearchSessions {
    pub fn new(delay: Duration, max_sessions: usize) -> Self {
        Self {
            state: Mutex::new(SessionTable::default()),
            delay,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn session(&self, client_id: &str) -> Arc<SearchDebouncer> {
        let mut state = self.state.lock();
        state.clock += 1;
        let now = state.clock;

        if let Some(existing) = state.sessions.get_mut(client_id) {
            existing.last_used = now;
            return existing.debouncer.clone();
        }

        if state.sessions.len() >= self.max_sessions {
            let before = state.sessions.len();
            state
                .sessions
                .retain(|_, session| Arc::strong_count(&session.debouncer) > 1);
            debug!("Dropped {} idle search sessions", before - state.sessions.len());
        }

        if state.sessions.len() >= self.max_sessions {
            let oldest = state
                .sessions
                .iter()
                .min_by_key(|(_, session)| session.last_used)
                .map(|(client, _)| client.clone());
            if let Some(oldest) = oldest {
                debug!("Evicting busy search session '{}'", oldest);
                state.sessions.remove(&oldest);
            }
        }

        let debouncer = Arc::new(SearchDebouncer::new(self.delay));
        state.sessions.insert(
            client_id.to_string(),
            Session {
                debouncer: debouncer.clone(),
                last_used: now,
            },
        );
        debouncer
    }

    pub fn len(&self) -> usize {
        self.state.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().sessions.is_empty()
    }
}

impl Default for SearchSessions {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, DEFAULT_MAX_SESSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_single_search_is_delivered_after_delay() {
        let debouncer = SearchDebouncer::default();
        let started = tokio::time::Instant::now();

        let outcome = debouncer.run(|| async { "ana" }).await;

        assert_eq!(outcome, SearchOutcome::Fresh("ana"));
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_fetches_once() {
        let debouncer = Arc::new(SearchDebouncer::default());
        let fetches = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for term in ["a", "an", "ana"] {
            let debouncer = debouncer.clone();
            let fetches = fetches.clone();
            handles.push(tokio::spawn(async move {
                debouncer
                    .run(|| async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        term
                    })
                    .await
            }));
            sleep(Duration::from_millis(100)).await;
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        assert_eq!(
            outcomes,
            vec![
                SearchOutcome::Superseded,
                SearchOutcome::Superseded,
                SearchOutcome::Fresh("ana"),
            ]
        );
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_in_flight_result_is_dropped() {
        let debouncer = Arc::new(SearchDebouncer::new(Duration::from_millis(300)));

        // First search is slow on the wire
        let slow = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move {
                debouncer
                    .run(|| async {
                        sleep(Duration::from_secs(2)).await;
                        "old"
                    })
                    .await
            })
        };

        // Submitted while the first one is in flight, answers quickly
        sleep(Duration::from_millis(500)).await;
        let fast = debouncer.run(|| async { "new" }).await;

        assert_eq!(fast, SearchOutcome::Fresh("new"));
        assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_supersedes_pending_search() {
        let debouncer = Arc::new(SearchDebouncer::default());
        let pending = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.run(|| async { 1 }).await })
        };

        sleep(Duration::from_millis(50)).await;
        debouncer.cancel();

        assert_eq!(pending.await.unwrap(), SearchOutcome::Superseded);
        assert_eq!(debouncer.current_generation(), 2);
    }

    #[test]
    fn test_into_fresh() {
        assert_eq!(SearchOutcome::Fresh(3).into_fresh(), Some(3));
        assert_eq!(SearchOutcome::<u8>::Superseded.into_fresh(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_are_independent() {
        let sessions = SearchSessions::default();
        let ana = sessions.session("ana");
        let bruno = sessions.session("bruno");

        let (a, b) = tokio::join!(
            ana.run(|| async { "from ana" }),
            bruno.run(|| async { "from bruno" })
        );

        assert_eq!(a, SearchOutcome::Fresh("from ana"));
        assert_eq!(b, SearchOutcome::Fresh("from bruno"));
        assert!(Arc::ptr_eq(&ana, &sessions.session("ana")));
    }

    #[test]
    fn test_idle_sessions_are_dropped_at_capacity() {
        let sessions = SearchSessions::new(DEFAULT_DEBOUNCE, 2);
        let busy = sessions.session("busy");
        drop(sessions.session("idle"));

        let _third = sessions.session("third");

        assert_eq!(sessions.len(), 2);
        assert!(Arc::ptr_eq(&busy, &sessions.session("busy")));
    }

    #[test]
    fn test_busy_sessions_never_exceed_capacity() {
        let sessions = SearchSessions::new(DEFAULT_DEBOUNCE, 2);
        let first = sessions.session("first");
        let second = sessions.session("second");
        // "first" was used more recently than "second"
        let _ = sessions.session("first");

        let third = sessions.session("third");

        assert_eq!(sessions.len(), 2);
        assert!(Arc::ptr_eq(&first, &sessions.session("first")));
        assert!(Arc::ptr_eq(&third, &sessions.session("third")));
        assert!(!Arc::ptr_eq(&second, &sessions.session("second")));
    }
}
