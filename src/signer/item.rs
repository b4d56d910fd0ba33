//! Item and collection signing with explicit partial-failure results.
//!
//! Signing never mutates the caller's [`Item`]. Assets are visited in key order and the batch
//! stops at the first failure; the error carries the partially signed copy so callers can
//! decide whether to keep what succeeded or discard it.

// self
use crate::{
	_prelude::*,
	asset::{Item, ItemAsset},
	fetch::TokenFetcher,
	obs::{self, SignOp, SignOutcome, SignSpan},
	signer::AssetSigner,
};

/// Failure while signing one item.
#[derive(Debug, ThisError)]
#[error("Signing asset `{asset_key}` of item `{item_id}` failed.")]
pub struct ItemSigningError {
	/// Identifier of the item being signed.
	pub item_id: String,
	/// Key of the asset that failed; assets after it in key order were not attempted.
	pub asset_key: String,
	/// Copy of the item with every asset before `asset_key` signed and the rest untouched.
	pub partial: Box<Item>,
	/// Underlying signer error.
	#[source]
	pub source: Error,
}
impl ItemSigningError {
	/// Discards the partial item and returns the underlying error.
	pub fn into_source(self) -> Error {
		self.source
	}
}

/// Failure while signing a batch of items.
#[derive(Debug, ThisError)]
#[error("Signing item {index} of the collection failed.")]
pub struct CollectionSigningError {
	/// Items signed successfully before the failure, in input order.
	pub completed: Vec<Item>,
	/// Position of the failing item in the input.
	pub index: usize,
	/// Failure for that item, including its partial copy.
	#[source]
	pub source: Box<ItemSigningError>,
}

/// Applies an [`AssetSigner`] to every asset of an item or collection.
pub struct ItemSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	signer: AssetSigner<F>,
}
impl<F> ItemSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	/// Wraps an asset signer.
	pub fn new(signer: AssetSigner<F>) -> Self {
		Self { signer }
	}

	/// Returns the wrapped asset signer.
	pub fn asset_signer(&self) -> &AssetSigner<F> {
		&self.signer
	}

	/// Returns a copy of `item` with every asset signed.
	pub async fn sign_item(&self, item: &Item) -> Result<Item, ItemSigningError> {
		const OP: SignOp = SignOp::Item;

		let span = SignSpan::new(OP, "sign_item");

		obs::record_sign_outcome(OP, SignOutcome::Attempt);

		let result = span.instrument(self.sign_assets(item)).await;

		obs::record_result(OP, &result);

		result
	}

	/// Signs every item in order, stopping at the first failing item.
	pub async fn sign_collection(&self, items: &[Item]) -> Result<Vec<Item>, CollectionSigningError> {
		const OP: SignOp = SignOp::Collection;

		let span = SignSpan::new(OP, "sign_collection");

		obs::record_sign_outcome(OP, SignOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut completed = Vec::with_capacity(items.len());

				for (index, item) in items.iter().enumerate() {
					match self.sign_item(item).await {
						Ok(signed) => completed.push(signed),
						Err(source) =>
							return Err(CollectionSigningError {
								completed,
								index,
								source: Box::new(source),
							}),
					}
				}

				Ok(completed)
			})
			.await;

		obs::record_result(OP, &result);

		result
	}

	async fn sign_assets(&self, item: &Item) -> Result<Item, ItemSigningError> {
		let mut signed = item.clone();

		for (key, entry) in &item.assets {
			match self.signer.sign_entry(entry).await {
				Ok(asset) => {
					signed.assets.insert(key.clone(), ItemAsset::Signed(asset));
				},
				Err(source) =>
					return Err(ItemSigningError {
						item_id: item.id.clone(),
						asset_key: key.clone(),
						partial: Box::new(signed),
						source,
					}),
			}
		}

		Ok(signed)
	}
}
impl<F> Clone for ItemSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	fn clone(&self) -> Self {
		Self { signer: self.signer.clone() }
	}
}
impl<F> Debug for ItemSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ItemSigner").field("signer", &self.signer).finish()
	}
}
impl<F> From<AssetSigner<F>> for ItemSigner<F>
where
	F: ?Sized + TokenFetcher,
{
	fn from(signer: AssetSigner<F>) -> Self {
		Self::new(signer)
	}
}
