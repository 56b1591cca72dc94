//! The roster store: authoritative roster, query state, derived result.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use directory::{Person, QueryState, SortKey, query};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;

use crate::error::FetchFailure;
use crate::provider::PeopleProvider;
use crate::subscription::{Observers, Subscription};

/// Immutable snapshot of the filtered, sorted roster.
pub type DerivedResult = Arc<[Person]>;

type FetchResult = Result<Arc<[Person]>, FetchFailure>;
type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

/// Load lifecycle of a store.
///
/// ```text
/// Uninitialized ──► Loading ──┬──► Ready ──┐
///                     ▲       └──► Error ──┤
///                     └────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Error,
}

/// Consumer-facing view of the store's load state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterStatus {
    pub state: LoadState,
    /// The most recent failure, cleared by the next successful load.
    pub error: Option<FetchFailure>,
    pub roster_len: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// What a call to [`RosterStore::load`] or [`RosterStore::reload`] achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The roster was replaced.
    Loaded { people: usize },
    /// The fetch failed; the previous roster is still in place.
    Failed(FetchFailure),
    /// A newer request was issued before this one resolved; its response was
    /// discarded.
    Superseded,
}

struct InFlight {
    request: u64,
    load: SharedLoad,
}

struct Inner {
    roster: Arc<[Person]>,
    query: QueryState,
    derived: DerivedResult,
    /// Bumped on every recomputation; orders observer notifications.
    revision: u64,
    state: LoadState,
    error: Option<FetchFailure>,
    loaded_at: Option<DateTime<Utc>>,
    /// Id of the most recently issued request; only its response is applied.
    latest_request: u64,
    in_flight: Option<InFlight>,
}

impl Inner {
    fn recompute(&mut self) -> (u64, DerivedResult) {
        self.derived = Arc::from(query(&self.roster, &self.query));
        self.revision += 1;
        metrics::counter!("roster_recomputations_total").increment(1);
        (self.revision, Arc::clone(&self.derived))
    }
}

/// State shared between the store and its fetch tasks.
struct Core {
    inner: Mutex<Inner>,
    observers: Arc<Observers>,
}

impl Core {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies the response of `request` if it is still the latest one.
    fn complete(&self, request: u64, result: FetchResult) -> LoadOutcome {
        let mut inner = self.lock();

        if request != inner.latest_request {
            tracing::warn!(
                request,
                latest = inner.latest_request,
                "discarding superseded roster response"
            );
            metrics::counter!("roster_stale_responses_total").increment(1);
            return LoadOutcome::Superseded;
        }
        inner.in_flight = None;

        match result {
            Ok(people) => {
                inner.roster = people;
                inner.error = None;
                inner.state = LoadState::Ready;
                inner.loaded_at = Some(Utc::now());
                let people = inner.roster.len();
                metrics::gauge!("roster_people").set(people as f64);
                tracing::info!(request, people, "roster loaded");

                let (revision, derived) = inner.recompute();
                drop(inner);
                self.observers.notify(revision, &derived);
                LoadOutcome::Loaded { people }
            }
            Err(failure) => {
                tracing::warn!(
                    request,
                    error = %failure,
                    retained = inner.roster.len(),
                    "roster load failed, keeping previous roster"
                );
                metrics::counter!("roster_load_failures_total").increment(1);
                inner.error = Some(failure.clone());
                inner.state = LoadState::Error;
                LoadOutcome::Failed(failure)
            }
        }
    }
}

/// Single owner of the roster and the query state.
///
/// Query setters recompute the derived result before they return, so a
/// read after a setter is never stale. Fetch failures are recorded on the
/// store and reported as data; the previously loaded roster stays in place.
///
/// Each fetch runs as its own tokio task and applies its response even if
/// every caller awaiting it has been dropped, so loads must be started from
/// within a tokio runtime.
///
/// The store is `Send + Sync`; share it with `Arc`.
pub struct RosterStore {
    provider: Arc<dyn PeopleProvider>,
    core: Arc<Core>,
}

impl RosterStore {
    /// Creates an empty store that will fetch from `provider`.
    pub fn new(provider: impl PeopleProvider + 'static) -> Self {
        Self::with_query(provider, QueryState::default())
    }

    /// Creates an empty store with an initial query state.
    pub fn with_query(provider: impl PeopleProvider + 'static, query: QueryState) -> Self {
        Self {
            provider: Arc::new(provider),
            core: Arc::new(Core {
                inner: Mutex::new(Inner {
                    roster: Arc::from(Vec::new()),
                    query,
                    derived: Arc::from(Vec::new()),
                    revision: 0,
                    state: LoadState::Uninitialized,
                    error: None,
                    loaded_at: None,
                    latest_request: 0,
                    in_flight: None,
                }),
                observers: Arc::new(Observers::default()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.core.lock()
    }

    /// Fetches the roster, joining the in-flight request if there is one.
    ///
    /// Concurrent callers share a single provider call and all see its
    /// outcome.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> LoadOutcome {
        let load = {
            let mut inner = self.lock();
            let joined = inner
                .in_flight
                .as_ref()
                .map(|flight| (flight.request, flight.load.clone()));
            match joined {
                Some((request, load)) => {
                    tracing::debug!(request, "joining in-flight roster request");
                    load
                }
                None => self.begin(&mut inner),
            }
        };
        load.await
    }

    /// Issues a new fetch that supersedes any request still in flight.
    ///
    /// If an older request resolves later its response is dropped.
    #[tracing::instrument(skip(self))]
    pub async fn reload(&self) -> LoadOutcome {
        let load = {
            let mut inner = self.lock();
            self.begin(&mut inner)
        };
        load.await
    }

    fn begin(&self, inner: &mut Inner) -> SharedLoad {
        inner.latest_request += 1;
        let request = inner.latest_request;

        let provider = Arc::clone(&self.provider);
        let core = Arc::clone(&self.core);
        let task = tokio::spawn(async move {
            let result = match provider.get_all().await {
                Ok(response) => validate(response.data),
                Err(err) => Err(FetchFailure::from(err)),
            };
            core.complete(request, result)
        });

        let core = Arc::clone(&self.core);
        let load: BoxFuture<'static, LoadOutcome> = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(request, error = %err, "roster fetch task did not finish");
                    core.complete(request, Err(FetchFailure::Transport(err.to_string())))
                }
            }
        }
        .boxed();
        let load = load.shared();

        inner.in_flight = Some(InFlight {
            request,
            load: load.clone(),
        });
        inner.state = LoadState::Loading;
        metrics::counter!("roster_loads_total").increment(1);
        tracing::debug!(request, "roster request issued");

        load
    }

    fn update_query(&self, update: impl FnOnce(&mut QueryState)) {
        let (revision, derived) = {
            let mut inner = self.lock();
            update(&mut inner.query);
            inner.recompute()
        };
        self.core.observers.notify(revision, &derived);
    }

    /// Sets the free-text filter and recomputes the derived result.
    pub fn set_free_text_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.update_query(|q| q.free_text_query = text);
    }

    /// Sets the sort key and recomputes the derived result.
    pub fn set_sort_key(&self, key: SortKey) {
        self.update_query(|q| q.sort_key = key);
    }

    /// Replaces the whole query state with a single recomputation.
    pub fn set_query_state(&self, state: QueryState) {
        self.update_query(|q| *q = state);
    }

    /// Returns the current derived result.
    ///
    /// Empty until the first successful load.
    pub fn derived_result(&self) -> DerivedResult {
        Arc::clone(&self.lock().derived)
    }

    pub fn query_state(&self) -> QueryState {
        self.lock().query.clone()
    }

    /// Returns the unfiltered roster in provider order.
    pub fn roster(&self) -> Arc<[Person]> {
        Arc::clone(&self.lock().roster)
    }

    pub fn status(&self) -> RosterStatus {
        let inner = self.lock();
        RosterStatus {
            state: inner.state,
            error: inner.error.clone(),
            roster_len: inner.roster.len(),
            loaded_at: inner.loaded_at,
        }
    }

    /// Registers `observer` to receive every new derived result.
    ///
    /// Observers run after the store's lock is released and may call back
    /// into the store. No ordering is guaranteed between observers. When
    /// writers race, a snapshot older than one already delivered is skipped,
    /// so the last snapshot an observer sees is the newest one.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&DerivedResult) + Send + Sync + 'static,
    {
        let id = self.core.observers.insert(Arc::new(observer));
        tracing::debug!(subscription = %id, "observer subscribed");
        Subscription::new(id, &self.core.observers)
    }

    /// Returns the number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.core.observers.len()
    }
}

impl std::fmt::Debug for RosterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterStore")
            .field("status", &self.status())
            .field("query", &self.query_state())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Rejects responses in which two people share an id.
fn validate(people: Vec<Person>) -> FetchResult {
    let mut seen = HashSet::with_capacity(people.len());
    for person in &people {
        if !seen.insert(&person.id) {
            return Err(FetchFailure::DuplicateId(person.id.clone()));
        }
    }
    Ok(Arc::from(people))
}
