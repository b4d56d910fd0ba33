//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use parking_lot::Mutex;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use url::Url;
// self
use stac_signer::{
	asset::{Asset, Item},
	cache::TokenCache,
	config::SignerConfig,
	error::Result,
	fetch::{FetchFuture, SasClient, TokenFetcher},
	signer::ReqwestAssetSigner,
	storage::StorageCoordinate,
	token::SasToken,
};

/// Storage domain used by every fixture href.
pub const STORAGE_DOMAIN: &str = "blob.core.windows.net";

/// Builds a signer pointed at a mock SAS endpoint, returning the shared cache alongside it.
pub fn build_reqwest_test_signer(
	sas_endpoint: &str,
	subscription_key: Option<&str>,
) -> (ReqwestAssetSigner, Arc<TokenCache>) {
	let mut builder = SignerConfig::builder()
		.sas_endpoint(Url::parse(sas_endpoint).expect("Mock SAS endpoint should parse successfully."));

	if let Some(key) = subscription_key {
		builder = builder.subscription_key(key);
	}

	let config = builder.build().expect("Test signer configuration should be valid.");
	let cache = Arc::new(TokenCache::new(config.safety_margin));
	let client = SasClient::new(&config).expect("Test SAS client should build.");
	let signer = ReqwestAssetSigner::with_parts(&config, cache.clone(), client);

	(signer, cache)
}

/// Renders a SAS token endpoint response body.
pub fn token_body(token: &str, expiry: OffsetDateTime) -> String {
	let expiry = expiry.format(&Rfc3339).expect("Fixture expiry should format as RFC 3339.");

	format!("{{\"msft:expiry\":\"{expiry}\",\"token\":\"{token}\"}}")
}

/// Builds a storage-hosted asset fixture.
pub fn blob_asset(account: &str, container: &str, name: &str) -> Asset {
	Asset::new(format!("https://{account}.{STORAGE_DOMAIN}/{container}/{name}"))
		.with_title(name)
		.with_description(format!("{name} fixture"))
		.with_media_type("image/tiff; application=geotiff; profile=cloud-optimized")
		.with_roles(["data"])
}

/// Builds an item fixture from `(key, asset)` pairs.
pub fn item<I>(id: &str, assets: I) -> Item
where
	I: IntoIterator<Item = (&'static str, Asset)>,
{
	assets
		.into_iter()
		.fold(Item::new(id).with_collection("sentinel-2-l2a"), |item, (key, asset)| {
			item.with_asset(key, asset)
		})
}

/// Fetcher replaying scripted outcomes and recording the coordinates it was asked for.
pub struct ScriptedFetcher {
	script: Mutex<Vec<Result<SasToken>>>,
	requested: Mutex<Vec<StorageCoordinate>>,
	calls: AtomicUsize,
}
impl ScriptedFetcher {
	pub fn new(mut script: Vec<Result<SasToken>>) -> Self {
		script.reverse();

		Self { script: Mutex::new(script), requested: Mutex::default(), calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn requested(&self) -> Vec<StorageCoordinate> {
		self.requested.lock().clone()
	}
}
impl TokenFetcher for ScriptedFetcher {
	fn fetch<'a>(&'a self, coordinate: &'a StorageCoordinate) -> FetchFuture<'a, SasToken> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.requested.lock().push(coordinate.clone());

		let next = self.script.lock().pop().expect("Fetcher script should not run dry.");

		Box::pin(async move { next })
	}
}
