//! Asset signing: classify, fetch or reuse the container token, rewrite the href.
//!
//! [`AssetSigner::sign`] leaves hrefs outside the storage domain untouched (with a far-future
//! expiry) and otherwise replaces any existing query string with the cached container token, so
//! re-signing never accumulates credentials. [`ItemSigner`] applies the same logic to every asset
//! of an item.

pub mod item;

pub use item::*;

// self
#[cfg(feature = "reqwest")] use crate::{config::SignerConfig, fetch::SasClient};
use crate::{
	_prelude::*,
	asset::{Asset, ItemAsset, SignedAsset},
	cache::TokenCache,
	fetch::{SignedLink, TokenFetcher},
	obs::{self, SignOp, SignOutcome, SignSpan},
	storage::{Classification, UrlClassifier},
};

#[cfg(feature = "reqwest")]
/// Signer specialized for the crate's reqwest-backed SAS client.
pub type ReqwestAssetSigner = AssetSigner<SasClient>;

/// Validity reported for hrefs that need no credential.
pub const PUBLIC_HREF_VALIDITY: Duration = Duration::days(365);

/// Turns asset references into signed references using a shared [`TokenCache`].
pub struct AssetSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	/// Classifier deciding which hrefs need a credential.
	pub classifier: UrlClassifier,
	/// Token cache shared with other signers.
	pub cache: Arc<TokenCache>,
	/// Fetcher invoked on cache misses.
	pub fetcher: Arc<F>,
}
impl<F> AssetSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	/// Creates a signer from its collaborators.
	pub fn with_fetcher(
		classifier: UrlClassifier,
		cache: Arc<TokenCache>,
		fetcher: impl Into<Arc<F>>,
	) -> Self {
		Self { classifier, cache, fetcher: fetcher.into() }
	}

	/// Signs one asset, copying every field except `href`.
	pub async fn sign(&self, asset: &Asset) -> Result<SignedAsset> {
		const OP: SignOp = SignOp::Asset;

		let span = SignSpan::new(OP, "sign");

		obs::record_sign_outcome(OP, SignOutcome::Attempt);

		let result = span
			.instrument(async move {
				let link = self.sign_href(&asset.href).await?;

				Ok(SignedAsset { asset: asset.with_href(link.href), expiry: link.expiry })
			})
			.await;

		obs::record_result(OP, &result);

		result
	}

	/// Signs the base record of either slot variant; signed slots are re-signed from scratch.
	pub async fn sign_entry(&self, entry: &ItemAsset) -> Result<SignedAsset> {
		self.sign(entry.asset()).await
	}

	/// Signs a bare href.
	pub async fn sign_href(&self, href: &str) -> Result<SignedLink> {
		match self.classifier.classify(href)? {
			Classification::NotApplicable => Ok(SignedLink {
				href: href.to_owned(),
				expiry: OffsetDateTime::now_utc() + PUBLIC_HREF_VALIDITY,
			}),
			Classification::Storage(coordinate) => {
				let token = self.cache.get_or_refresh(&coordinate, self.fetcher.as_ref()).await?;
				let href = append_token(href, token.value.expose());

				Ok(SignedLink { href, expiry: token.expiry })
			},
		}
	}

	/// Returns an [`ItemSigner`] sharing this signer's cache and fetcher.
	pub fn items(&self) -> ItemSigner<F> {
		ItemSigner::new(self.clone())
	}
}
#[cfg(feature = "reqwest")]
impl AssetSigner<SasClient> {
	/// Creates a signer with a fresh cache and a reqwest-backed SAS client.
	pub fn new(config: &SignerConfig) -> Result<Self> {
		let cache = Arc::new(TokenCache::new(config.safety_margin));
		let client = SasClient::new(config)?;

		Ok(Self::with_parts(config, cache, client))
	}

	/// Creates a signer sharing an existing cache.
	pub fn with_parts(config: &SignerConfig, cache: Arc<TokenCache>, client: SasClient) -> Self {
		Self::with_fetcher(UrlClassifier::new(&config.storage_domain), cache, client)
	}
}
impl<F> Clone for AssetSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	fn clone(&self) -> Self {
		Self {
			classifier: self.classifier.clone(),
			cache: self.cache.clone(),
			fetcher: self.fetcher.clone(),
		}
	}
}
impl<F> Debug for AssetSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AssetSigner")
			.field("classifier", &self.classifier)
			.field("cache", &self.cache)
			.finish()
	}
}

/// Cuts `href` at its query or fragment, then appends the token as the only query.
///
/// The remaining prefix is kept byte for byte, so encodings and explicit ports survive.
fn append_token(href: &str, token: &str) -> String {
	let base = href.find(['?', '#']).map_or(href, |end| &href[..end]);

	format!("{base}?{token}")
}
