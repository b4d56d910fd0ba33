//! Per-container SAS token cache with singleflight refresh.
//!
//! [`TokenCache::get_or_refresh`] acquires a per-[`StorageCoordinate`] guard, reuses the cached
//! token while `now < expiry - safety_margin`, and otherwise calls the provided
//! [`TokenFetcher`] once. A successful fetch replaces the entry wholesale; a failed fetch leaves
//! the previous entry (or its absence) untouched. Concurrent callers on the same key wait on the
//! guard and then observe the token stored by whoever refreshed first.

mod metrics;

pub use self::metrics::CacheMetrics;

// self
use crate::{
	_prelude::*,
	fetch::TokenFetcher,
	obs,
	storage::StorageCoordinate,
	token::{SasToken, TokenState},
};

type GuardMap = Mutex<HashMap<StorageCoordinate, Arc<AsyncMutex<()>>>>;

/// Shared token cache keyed by storage coordinate.
pub struct TokenCache {
	entries: RwLock<HashMap<StorageCoordinate, SasToken>>,
	guards: GuardMap,
	safety_margin: Duration,
	metrics: CacheMetrics,
}
impl TokenCache {
	/// Default safety margin applied by [`TokenCache::default`].
	pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::minutes(5);

	/// Creates an empty cache; negative margins are clamped to zero.
	pub fn new(safety_margin: Duration) -> Self {
		Self {
			entries: Default::default(),
			guards: Default::default(),
			safety_margin: if safety_margin.is_negative() { Duration::ZERO } else { safety_margin },
			metrics: Default::default(),
		}
	}

	/// Returns the window before expiry in which tokens count as stale.
	pub fn safety_margin(&self) -> Duration {
		self.safety_margin
	}

	/// Returns hit/refresh/failure counters.
	pub fn metrics(&self) -> &CacheMetrics {
		&self.metrics
	}

	/// Returns the cached token for `key`, regardless of freshness.
	pub fn get(&self, key: &StorageCoordinate) -> Option<SasToken> {
		self.entries.read().get(key).cloned()
	}

	/// Classifies the slot for `key` at `now`.
	pub fn state_at(&self, key: &StorageCoordinate, now: OffsetDateTime) -> TokenState {
		match self.entries.read().get(key) {
			Some(token) => token.state_at(now, self.safety_margin),
			None => TokenState::Absent,
		}
	}

	/// Classifies the slot for `key` using the current UTC clock.
	pub fn state(&self, key: &StorageCoordinate) -> TokenState {
		self.state_at(key, OffsetDateTime::now_utc())
	}

	/// Number of cached entries (valid or stale).
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns `true` when nothing has been cached yet.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Returns a valid cached token or fetches (and stores) a fresh one.
	pub async fn get_or_refresh<F>(&self, key: &StorageCoordinate, fetcher: &F) -> Result<SasToken>
	where
		F: ?Sized + TokenFetcher,
	{
		let guard = self.guard(key);
		let _singleflight = guard.lock().await;

		if let Some(token) = self.valid_at(key, OffsetDateTime::now_utc()) {
			self.metrics.record_hit();

			return Ok(token);
		}

		match fetcher.fetch(key).await {
			Ok(token) => {
				self.entries.write().insert(key.clone(), token.clone());
				self.metrics.record_refresh();
				obs::record_token_refresh(key);

				Ok(token)
			},
			Err(err) => {
				self.metrics.record_failure();

				Err(err)
			},
		}
	}

	fn valid_at(&self, key: &StorageCoordinate, now: OffsetDateTime) -> Option<SasToken> {
		self.entries
			.read()
			.get(key)
			.filter(|token| token.is_valid_at(now, self.safety_margin))
			.cloned()
	}

	/// Returns (and creates on demand) the singleflight guard for a key.
	fn guard(&self, key: &StorageCoordinate) -> Arc<AsyncMutex<()>> {
		let mut guards = self.guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl Default for TokenCache {
	fn default() -> Self {
		Self::new(Self::DEFAULT_SAFETY_MARGIN)
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("entries", &self.len())
			.field("safety_margin", &self.safety_margin)
			.field("metrics", &self.metrics)
			.finish()
	}
}
