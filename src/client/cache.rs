use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::client::error::FetchError;

/// Identifies one logical query, e.g. `["product", "65a1…"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self(vec![resource.into()])
    }

    /// Appends a parameter to the key.
    pub fn with(mut self, param: impl Into<String>) -> Self {
        self.0.push(param.into());
        self
    }

    /// The key for the full product list.
    pub fn products() -> Self {
        Self::new("products")
    }

    /// The key for a single product.
    pub fn product(id: &str) -> Self {
        Self::new("product").with(id)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// What a view knows about a query.
#[derive(Debug)]
pub enum QueryState<T> {
    /// Never requested.
    Idle,
    /// A fetch is in flight.
    Loading,
    Success(Arc<T>),
    Error(FetchError),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    /// The fetched value, once there is one.
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Transforms the fetched value, keeping every other state as is.
    pub fn map<U>(self, f: impl FnOnce(&T) -> U) -> QueryState<U> {
        match self {
            QueryState::Idle => QueryState::Idle,
            QueryState::Loading => QueryState::Loading,
            QueryState::Success(data) => QueryState::Success(Arc::new(f(data.as_ref()))),
            QueryState::Error(err) => QueryState::Error(err),
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        match self {
            QueryState::Idle => QueryState::Idle,
            QueryState::Loading => QueryState::Loading,
            QueryState::Success(data) => QueryState::Success(Arc::clone(data)),
            QueryState::Error(err) => QueryState::Error(err.clone()),
        }
    }
}

type Outcome<T> = Result<Arc<T>, FetchError>;
/// `None` while the fetch is in flight, then the settled outcome.
type Slot<T> = watch::Receiver<Option<Outcome<T>>>;

impl<T> From<&Outcome<T>> for QueryState<T> {
    fn from(outcome: &Outcome<T>) -> Self {
        match outcome {
            Ok(data) => QueryState::Success(Arc::clone(data)),
            Err(err) => QueryState::Error(err.clone()),
        }
    }
}

const ABANDONED: &str = "fetch ended without a result";

fn slot_state<T>(slot: &Slot<T>) -> QueryState<T> {
    match &*slot.borrow() {
        Some(outcome) => outcome.into(),
        None if slot.has_changed().is_err() => {
            QueryState::Error(FetchError::Transport(ABANDONED.to_string()))
        }
        None => QueryState::Loading,
    }
}

/// A cache of query results keyed by `QueryKey`.
///
/// Concurrent queries for the same key share one fetch. The fetch runs on its
/// own task, so a waiter that goes away does not cancel it for the others.
/// Successful results stay cached for the life of the cache; a failed result
/// is reported to everyone waiting on it and replaced by a fresh fetch on the
/// next query.
pub struct QueryCache<T> {
    entries: Arc<Mutex<HashMap<QueryKey, Slot<T>>>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T: Send + Sync + 'static> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, starting `fetch` only if there is
    /// neither a cached value nor a fetch already in flight.
    pub async fn query<F, Fut>(&self, key: QueryKey, fetch: F) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let mut slot = {
            let mut entries = self.entries.lock().await;
            match entries.get(&key) {
                Some(slot) if !slot_state(slot).is_error() => slot.clone(),
                _ => {
                    let (tx, slot) = watch::channel(None);
                    entries.insert(key.clone(), slot.clone());
                    spawn_fetch(key.clone(), fetch(), tx);
                    slot
                }
            }
        };

        let settled = slot
            .wait_for(Option::is_some)
            .await
            .map(|outcome| (*outcome).clone());
        match settled {
            Ok(Some(outcome)) => (&outcome).into(),
            Ok(None) => QueryState::Loading,
            Err(_) => {
                tracing::warn!("Fetch for {} was dropped", key);
                QueryState::Error(FetchError::Transport(ABANDONED.to_string()))
            }
        }
    }

    /// Reports the state of `key` without fetching.
    pub async fn peek(&self, key: &QueryKey) -> QueryState<T> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            None => QueryState::Idle,
            Some(slot) => slot_state(slot),
        }
    }

    /// The number of keys with an entry, in flight or settled.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn spawn_fetch<T, Fut>(key: QueryKey, fetch: Fut, tx: watch::Sender<Option<Outcome<T>>>)
where
    T: Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    tokio::spawn(async move {
        tracing::debug!("Fetching {}", key);
        let result = fetch.await.map(Arc::new);
        if let Err(ref e) = result {
            tracing::warn!("Fetch for {} failed: {}", key, e);
        }
        tx.send_replace(Some(result));
    });
}
