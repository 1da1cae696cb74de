//! In-flight coalescing and short-lived result caching.
//!
//! # Design
//! - One `RequestCoordinator` owns both maps; clones share them through an `Arc`.
//! - Concurrent callers for the same key join a single `Shared` operation, so the
//!   producer runs once and every caller observes the same result or error.
//! - Successful results of cacheable calls are kept for a fixed TTL. Expiry is
//!   driven by an insertion-ordered queue (fixed TTL means insertion order is
//!   expiry order) drained on every write, plus lazy expiry on read.
//! - Values are stored type-erased; the call site names the concrete type and a
//!   mismatch is treated as a miss.
//! - The ledger lock is only held for synchronous bookkeeping, never across an
//!   `.await`.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::runtime::Handle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Abandoned;
use crate::key::RequestKey;

/// Default freshness window for cached results.
pub const DEFAULT_TTL: Duration = Duration::from_millis(1_000);

type SharedOutcome<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;
type ErasedValue = Box<dyn Any + Send + Sync>;

/// Whether a coordinated call may be answered from, and may populate, the
/// result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Idempotent reads: probe and populate the cache.
    #[default]
    Cached,
    /// Mutations: coalesce concurrent duplicates but never cache.
    Bypass,
}

impl CachePolicy {
    const fn caches(self) -> bool {
        matches!(self, Self::Cached)
    }
}

/// Point-in-time sizes of the coordinator maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorStats {
    /// Operations currently awaiting completion.
    pub in_flight: usize,
    /// Stored results, including entries not yet swept after expiry.
    pub cached: usize,
}

struct InFlightEntry {
    generation: u64,
    /// Cleared by invalidation while the operation runs; its result is then
    /// returned to callers but not stored.
    cacheable: bool,
    operation: ErasedValue,
}

struct CachedEntry {
    generation: u64,
    stored_at: Instant,
    value: ErasedValue,
}

#[derive(Default)]
struct Ledger {
    in_flight: HashMap<RequestKey, InFlightEntry>,
    cached: HashMap<RequestKey, CachedEntry>,
    expiry: VecDeque<(Instant, RequestKey, u64)>,
    next_generation: u64,
}

struct Registry {
    ttl: Duration,
    ledger: Mutex<Ledger>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum Begin<T, E> {
    Ready(T),
    Pending(SharedOutcome<T, E>),
}

/// Coalesces duplicate requests and caches recent successful reads.
#[derive(Clone)]
pub struct RequestCoordinator {
    registry: Arc<Registry>,
}

impl RequestCoordinator {
    /// Construct a coordinator with the default one second TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Construct a coordinator with a custom freshness window.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            registry: Arc::new(Registry {
                ttl,
                ledger: Mutex::new(Ledger::default()),
            }),
        }
    }

    /// Freshness window applied to cached results.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.registry.ttl
    }

    /// Run `produce` for `key`, or share an existing result.
    ///
    /// With [`CachePolicy::Cached`] a fresh cached value is returned without
    /// invoking `produce`. Otherwise an in-flight operation for the same key is
    /// joined. Only when neither exists is `produce` invoked; its operation is
    /// registered before anything awaits it. Errors are returned unchanged and
    /// never cached.
    ///
    /// # Errors
    ///
    /// Returns the error produced by the underlying operation.
    pub async fn coordinate<T, E, F, Fut>(
        &self,
        key: RequestKey,
        produce: F,
        policy: CachePolicy,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        match self.begin(key, produce, policy) {
            Begin::Ready(value) => Ok(value),
            Begin::Pending(operation) => operation.await,
        }
    }

    /// Like [`coordinate`](Self::coordinate), but the caller may stop waiting.
    ///
    /// Cancelling `cancel` only releases this caller, which receives
    /// `E::from(Abandoned)`. The operation itself keeps running for other
    /// joined callers and still populates the cache on success.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or the converted [`Abandoned`] marker
    /// when the token fires first.
    pub async fn coordinate_until<T, E, F, Fut>(
        &self,
        key: RequestKey,
        produce: F,
        policy: CachePolicy,
        cancel: &CancellationToken,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + From<Abandoned> + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(E::from(Abandoned));
        }
        let operation = match self.begin(key, produce, policy) {
            Begin::Ready(value) => return Ok(value),
            Begin::Pending(operation) => operation,
        };
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("caller abandoned coordinated request");
                Err(E::from(Abandoned))
            }
            outcome = operation => outcome,
        }
    }

    /// Drop the cached result for `key`. Returns whether an entry existed.
    ///
    /// An operation for `key` that is still running will not cache its result.
    pub fn invalidate(&self, key: &RequestKey) -> bool {
        let mut ledger = self.registry.lock();
        if let Some(entry) = ledger.in_flight.get_mut(key) {
            entry.cacheable = false;
        }
        ledger.cached.remove(key).is_some()
    }

    /// Drop every cached result whose key starts with `prefix`.
    ///
    /// Running operations under `prefix` will not cache their results.
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut ledger = self.registry.lock();
        ledger
            .in_flight
            .iter_mut()
            .filter(|(key, _)| key.as_str().starts_with(prefix))
            .for_each(|(_, entry)| entry.cacheable = false);
        let before = ledger.cached.len();
        ledger
            .cached
            .retain(|key, _| !key.as_str().starts_with(prefix));
        before - ledger.cached.len()
    }

    /// Forget every in-flight and cached entry.
    ///
    /// Operations already running still complete for their current callers
    /// but no longer populate the cache.
    pub fn clear(&self) {
        let mut ledger = self.registry.lock();
        ledger.in_flight.clear();
        ledger.cached.clear();
        ledger.expiry.clear();
    }

    /// Current map sizes.
    #[must_use]
    pub fn stats(&self) -> CoordinatorStats {
        let ledger = self.registry.lock();
        CoordinatorStats {
            in_flight: ledger.in_flight.len(),
            cached: ledger.cached.len(),
        }
    }

    fn begin<T, E, F, Fut>(&self, key: RequestKey, produce: F, policy: CachePolicy) -> Begin<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let ttl = self.registry.ttl;
        if let Some(found) = self.registry.lock().probe(&key, policy, ttl) {
            return found;
        }

        // Producer runs outside the lock. The future is lazy, so losing the
        // race below drops it before any work starts.
        let pending = produce();

        let mut ledger = self.registry.lock();
        if let Some(found) = ledger.probe(&key, policy, ttl) {
            return found;
        }

        let generation = ledger.next_generation;
        ledger.next_generation += 1;
        let operation = settle(
            Arc::downgrade(&self.registry),
            key.clone(),
            generation,
            policy,
            pending,
        )
        .boxed()
        .shared();
        ledger.in_flight.insert(
            key,
            InFlightEntry {
                generation,
                cacheable: true,
                operation: Box::new(operation.clone()),
            },
        );
        drop(ledger);

        drive(operation.clone());
        Begin::Pending(operation)
    }
}

impl Default for RequestCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for RequestCoordinator {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        formatter
            .debug_struct("RequestCoordinator")
            .field("ttl", &self.registry.ttl)
            .field("in_flight", &stats.in_flight)
            .field("cached", &stats.cached)
            .finish()
    }
}

impl Ledger {
    fn probe<T, E>(&mut self, key: &RequestKey, policy: CachePolicy, ttl: Duration) -> Option<Begin<T, E>>
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        if policy.caches() {
            if let Some(value) = self.fresh::<T>(key, ttl) {
                debug!(key = %key, "serving cached result");
                return Some(Begin::Ready(value));
            }
        }

        let entry = self.in_flight.get(key)?;
        if let Some(operation) = entry.operation.downcast_ref::<SharedOutcome<T, E>>() {
            debug!(key = %key, "joining in-flight request");
            Some(Begin::Pending(operation.clone()))
        } else {
            warn!(key = %key, "in-flight request has a different result type; issuing a separate call");
            None
        }
    }

    fn fresh<T: Clone + 'static>(&mut self, key: &RequestKey, ttl: Duration) -> Option<T> {
        let age = Instant::now().saturating_duration_since(self.cached.get(key)?.stored_at);
        if age >= ttl {
            self.cached.remove(key);
            return None;
        }
        let value = self.cached.get(key)?.value.downcast_ref::<T>();
        if value.is_none() {
            warn!(key = %key, "cached result has a different type; treating as a miss");
        }
        value.cloned()
    }

    /// Remove this operation's in-flight entry. Returns whether its result may
    /// be cached: the entry was still registered and not invalidated.
    fn finish(&mut self, key: &RequestKey, generation: u64) -> bool {
        match self.in_flight.get(key) {
            Some(entry) if entry.generation == generation => self
                .in_flight
                .remove(key)
                .is_some_and(|entry| entry.cacheable),
            _ => false,
        }
    }

    fn store(&mut self, key: RequestKey, generation: u64, value: ErasedValue, ttl: Duration) {
        let now = Instant::now();
        self.cached.insert(
            key.clone(),
            CachedEntry {
                generation,
                stored_at: now,
                value,
            },
        );
        self.expiry.push_back((now, key, generation));
        self.expire(now, ttl);
    }

    fn expire(&mut self, now: Instant, ttl: Duration) {
        while let Some((stored_at, _, _)) = self.expiry.front() {
            if now.saturating_duration_since(*stored_at) < ttl {
                break;
            }
            let Some((_, key, generation)) = self.expiry.pop_front() else {
                break;
            };
            // A newer store for the same key carries its own queue entry.
            if self
                .cached
                .get(&key)
                .is_some_and(|entry| entry.generation == generation)
            {
                self.cached.remove(&key);
            }
        }
    }
}

async fn settle<T, E, Fut>(
    registry: Weak<Registry>,
    key: RequestKey,
    generation: u64,
    policy: CachePolicy,
    pending: Fut,
) -> Result<T, E>
where
    T: Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>>,
{
    let outcome = pending.await;
    if let Some(registry) = registry.upgrade() {
        let mut ledger = registry.lock();
        let cacheable = ledger.finish(&key, generation);
        if let (true, true, Ok(value)) = (cacheable, policy.caches(), &outcome) {
            ledger.store(key, generation, Box::new(value.clone()), registry.ttl);
        }
    }
    outcome
}

/// Poll the operation to completion on the runtime even if every caller stops
/// waiting.
fn drive<T, E>(operation: SharedOutcome<T, E>)
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    if let Ok(handle) = Handle::try_current() {
        handle.spawn(async move {
            let _ = operation.await;
        });
    } else {
        debug!("no tokio runtime; request only progresses while awaited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{QueryParams, generate_key};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{advance, sleep};

    #[derive(Debug, Clone, PartialEq)]
    enum TestError {
        Boom(Arc<String>),
        Abandoned,
    }

    impl From<Abandoned> for TestError {
        fn from(_: Abandoned) -> Self {
            Self::Abandoned
        }
    }

    fn fetch(
        calls: &Arc<AtomicUsize>,
        value: &[&str],
        delay: Duration,
    ) -> impl Future<Output = Result<Vec<String>, TestError>> + Send + 'static + use<> {
        let calls = Arc::clone(calls);
        let value: Vec<String> = value.iter().map(ToString::to_string).collect();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            sleep(delay).await;
            Ok(value)
        }
    }

    fn key(text: &str) -> RequestKey {
        RequestKey::from(text)
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_call() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (first, second) = tokio::join!(
            coordinator.coordinate(
                key("GET|/saplings"),
                || fetch(&calls, &["oak"], Duration::from_millis(20)),
                CachePolicy::Cached,
            ),
            coordinator.coordinate(
                key("GET|/saplings"),
                || fetch(&calls, &["never"], Duration::from_millis(20)),
                CachePolicy::Cached,
            ),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, Ok(vec!["oak".to_string()]));
        assert_eq!(first, second);
        assert_eq!(coordinator.stats().in_flight, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_breed_reads_within_five_ms_issue_one_fetch() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut params = QueryParams::new();
        params.insert("nurseryId".into(), json!(42));
        let breeds_key = generate_key("GET", "/breeds", Some(&params), None);
        assert_eq!(breeds_key.as_str(), "GET|/breeds|nurseryId=42");

        let first = coordinator.coordinate(
            breeds_key.clone(),
            || fetch(&calls, &["rose", "tulip"], Duration::from_millis(50)),
            CachePolicy::Cached,
        );
        let second = async {
            sleep(Duration::from_millis(5)).await;
            coordinator
                .coordinate(
                    breeds_key.clone(),
                    || fetch(&calls, &["other"], Duration::from_millis(50)),
                    CachePolicy::Cached,
                )
                .await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, Ok(vec!["rose".to_string(), "tulip".to_string()]));
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn cached_result_is_served_within_ttl() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let later_calls = Arc::new(AtomicUsize::new(0));

        let first = coordinator
            .coordinate(
                key("GET|/dashboard/summary"),
                || fetch(&calls, &["first"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;
        advance(Duration::from_millis(500)).await;
        let second = coordinator
            .coordinate(
                key("GET|/dashboard/summary"),
                || fetch(&later_calls, &["second"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;

        assert_eq!(second, first);
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cache_misses_after_ttl() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let later_calls = Arc::new(AtomicUsize::new(0));

        coordinator
            .coordinate(
                key("GET|/inventory"),
                || fetch(&calls, &["stale"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await
            .expect("first read");
        advance(DEFAULT_TTL + Duration::from_millis(1)).await;
        let second = coordinator
            .coordinate(
                key("GET|/inventory"),
                || fetch(&later_calls, &["fresh"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;

        assert_eq!(second, Ok(vec!["fresh".to_string()]));
        assert_eq!(later_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn bypass_policy_never_caches() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            coordinator
                .coordinate(
                    key(r#"POST|/breeds|{"breedName":"Rose"}"#),
                    || fetch(&calls, &["created"], Duration::ZERO),
                    CachePolicy::Bypass,
                )
                .await
                .expect("mutation");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(coordinator.stats().cached, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_propagate_unchanged_and_are_not_cached() {
        let coordinator = RequestCoordinator::new();
        let failure = Arc::new("backend exploded".to_string());
        let produced = Arc::clone(&failure);

        let failing = move || async move {
            sleep(Duration::from_millis(10)).await;
            Err::<Vec<String>, _>(TestError::Boom(produced))
        };
        let (leader, joiner) = tokio::join!(
            coordinator.coordinate(key("GET|/breeds/b-1"), failing, CachePolicy::Cached),
            coordinator.coordinate(
                key("GET|/breeds/b-1"),
                || async { Ok::<Vec<String>, TestError>(Vec::new()) },
                CachePolicy::Cached,
            ),
        );

        for outcome in [leader, joiner] {
            match outcome {
                Err(TestError::Boom(observed)) => assert!(Arc::ptr_eq(&observed, &failure)),
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(coordinator.stats(), CoordinatorStats::default());

        let calls = Arc::new(AtomicUsize::new(0));
        let retry = coordinator
            .coordinate(
                key("GET|/breeds/b-1"),
                || fetch(&calls, &["recovered"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;
        assert_eq!(retry, Ok(vec!["recovered".to_string()]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoning_caller_leaves_joiners_waiting() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();

        let leader = coordinator.coordinate_until(
            key("GET|/transactions"),
            || fetch(&calls, &["t-1"], Duration::from_millis(20)),
            CachePolicy::Cached,
            &token,
        );
        let joiner = async {
            sleep(Duration::from_millis(1)).await;
            coordinator
                .coordinate(
                    key("GET|/transactions"),
                    || fetch(&calls, &["duplicate"], Duration::from_millis(20)),
                    CachePolicy::Cached,
                )
                .await
        };
        let canceller = async {
            sleep(Duration::from_millis(5)).await;
            token.cancel();
        };
        let (leader, joiner, ()) = tokio::join!(leader, joiner, canceller);

        assert_eq!(leader, Err(TestError::Abandoned));
        assert_eq!(joiner, Ok(vec!["t-1".to_string()]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_operation_still_completes_and_caches() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();

        let canceller = async {
            sleep(Duration::from_millis(5)).await;
            token.cancel();
        };
        let (outcome, ()) = tokio::join!(
            coordinator.coordinate_until(
                key("GET|/theme/default"),
                || fetch(&calls, &["light"], Duration::from_millis(20)),
                CachePolicy::Cached,
                &token,
            ),
            canceller,
        );
        assert_eq!(outcome, Err(TestError::Abandoned));

        sleep(Duration::from_millis(30)).await;
        assert_eq!(
            coordinator.stats(),
            CoordinatorStats {
                in_flight: 0,
                cached: 1
            }
        );

        let later_calls = Arc::new(AtomicUsize::new(0));
        let cached = coordinator
            .coordinate(
                key("GET|/theme/default"),
                || fetch(&later_calls, &["dark"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;
        assert_eq!(cached, Ok(vec!["light".to_string()]));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_skips_the_producer() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        token.cancel();

        let outcome = coordinator
            .coordinate_until(
                key("GET|/payments/p-1"),
                || fetch(&calls, &["p-1"], Duration::ZERO),
                CachePolicy::Cached,
                &token,
            )
            .await;

        assert_eq!(outcome, Err(TestError::Abandoned));
        assert_eq!(coordinator.stats(), CoordinatorStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn writes_sweep_expired_entries() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        coordinator
            .coordinate(key("GET|/a"), || fetch(&calls, &["a"], Duration::ZERO), CachePolicy::Cached)
            .await
            .expect("a");
        advance(Duration::from_millis(1_500)).await;
        assert_eq!(coordinator.stats().cached, 1);

        coordinator
            .coordinate(key("GET|/b"), || fetch(&calls, &["b"], Duration::ZERO), CachePolicy::Cached)
            .await
            .expect("b");
        assert_eq!(coordinator.stats().cached, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_and_clear_drop_entries() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        for text in ["GET|/breeds|a", "GET|/breeds|b", "GET|/saplings|a"] {
            coordinator
                .coordinate(key(text), || fetch(&calls, &[text], Duration::ZERO), CachePolicy::Cached)
                .await
                .expect("read");
        }

        assert_eq!(coordinator.invalidate_prefix("GET|/breeds"), 2);
        assert!(coordinator.invalidate(&key("GET|/saplings|a")));
        assert!(!coordinator.invalidate(&key("GET|/saplings|a")));
        assert_eq!(coordinator.stats().cached, 0);

        coordinator
            .coordinate(key("GET|/x"), || fetch(&calls, &["x"], Duration::ZERO), CachePolicy::Cached)
            .await
            .expect("read");
        coordinator.clear();
        assert_eq!(coordinator.stats(), CoordinatorStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn read_settling_after_clear_is_not_cached() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let clearer = async {
            sleep(Duration::from_millis(10)).await;
            coordinator.clear();
        };
        let (old, ()) = tokio::join!(
            coordinator.coordinate(
                key("GET|/auth/me"),
                || fetch(&calls, &["old-user"], Duration::from_millis(50)),
                CachePolicy::Cached,
            ),
            clearer,
        );
        assert_eq!(old, Ok(vec!["old-user".to_string()]));
        assert_eq!(coordinator.stats(), CoordinatorStats::default());

        let fresh = coordinator
            .coordinate(
                key("GET|/auth/me"),
                || fetch(&calls, &["new-user"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;
        assert_eq!(fresh, Ok(vec!["new-user".to_string()]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn read_settling_after_prefix_invalidation_is_not_cached() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let invalidator = async {
            sleep(Duration::from_millis(10)).await;
            coordinator.invalidate_prefix("GET|/breeds");
        };
        let (stale, ()) = tokio::join!(
            coordinator.coordinate(
                key("GET|/breeds|a"),
                || fetch(&calls, &["stale"], Duration::from_millis(50)),
                CachePolicy::Cached,
            ),
            invalidator,
        );
        assert_eq!(stale, Ok(vec!["stale".to_string()]));
        assert_eq!(coordinator.stats().cached, 0);

        let after = coordinator
            .coordinate(
                key("GET|/breeds|a"),
                || fetch(&calls, &["fresh"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;
        assert_eq!(after, Ok(vec!["fresh".to_string()]));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_does_not_evict_the_next_generation() {
        let coordinator = RequestCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let slow = coordinator.coordinate(
            key("GET|/nursery"),
            || fetch(&calls, &["before"], Duration::from_millis(50)),
            CachePolicy::Cached,
        );
        let restart = async {
            sleep(Duration::from_millis(10)).await;
            coordinator.clear();
            coordinator
                .coordinate(
                    key("GET|/nursery"),
                    || fetch(&calls, &["after"], Duration::from_millis(5)),
                    CachePolicy::Cached,
                )
                .await
        };
        let (before, after) = tokio::join!(slow, restart);
        assert_eq!(before, Ok(vec!["before".to_string()]));
        assert_eq!(after, Ok(vec!["after".to_string()]));

        let cached = coordinator
            .coordinate(
                key("GET|/nursery"),
                || fetch(&calls, &["unused"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;
        assert_eq!(cached, Ok(vec!["after".to_string()]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn mismatched_cached_type_is_a_miss() {
        let coordinator = RequestCoordinator::new();
        coordinator
            .coordinate(
                key("GET|/auth/me"),
                || async { Ok::<u32, TestError>(7) },
                CachePolicy::Cached,
            )
            .await
            .expect("number");

        let calls = Arc::new(AtomicUsize::new(0));
        let text = coordinator
            .coordinate(
                key("GET|/auth/me"),
                || fetch(&calls, &["me"], Duration::ZERO),
                CachePolicy::Cached,
            )
            .await;
        assert_eq!(text, Ok(vec!["me".to_string()]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
