//! Token fetch contract and the SAS API client implementing it.

#[cfg(feature = "reqwest")] pub mod sas;

#[cfg(feature = "reqwest")] pub use sas::*;

// self
use crate::{_prelude::*, storage::StorageCoordinate, token::SasToken};

/// Boxed future returned by [`TokenFetcher::fetch`].
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Exchanges a storage coordinate for a fresh SAS token.
///
/// Implementations perform exactly one upstream request per call and never consult a cache;
/// reuse decisions belong to [`TokenCache`](crate::cache::TokenCache).
pub trait TokenFetcher
where
	Self: Send + Sync,
{
	/// Requests a new token for the coordinate.
	fn fetch<'a>(&'a self, coordinate: &'a StorageCoordinate) -> FetchFuture<'a, SasToken>;
}

/// Href signed directly by the SAS API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedLink {
	/// Signed href carrying the credential query string.
	pub href: String,
	/// Expiry instant in UTC.
	#[serde(with = "time::serde::rfc3339")]
	pub expiry: OffsetDateTime,
}
