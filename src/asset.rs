//! STAC asset and item records as consumed from, and handed back to, catalog clients.

// self
use crate::_prelude::*;

/// Immutable STAC asset record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
	/// Location of the asset bytes.
	pub href: String,
	/// Display title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Longer description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Media type (serialized as `type`).
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub media_type: Option<String>,
	/// Semantic roles such as `data` or `thumbnail`.
	#[serde(default)]
	pub roles: Vec<String>,
}
impl Asset {
	/// Creates an asset pointing at `href` with no optional metadata.
	pub fn new(href: impl Into<String>) -> Self {
		Self { href: href.into(), title: None, description: None, media_type: None, roles: Vec::new() }
	}

	/// Sets the title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());

		self
	}

	/// Sets the description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the media type.
	pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
		self.media_type = Some(media_type.into());

		self
	}

	/// Replaces the roles.
	pub fn with_roles<I, S>(mut self, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.roles = roles.into_iter().map(Into::into).collect();

		self
	}

	/// Returns a copy pointing at `href`, keeping every other field.
	pub fn with_href(&self, href: impl Into<String>) -> Self {
		Self { href: href.into(), ..self.clone() }
	}
}

/// Asset whose href carries a credential valid until `expiry`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAsset {
	/// Asset record with the signed href.
	#[serde(flatten)]
	pub asset: Asset,
	/// Expiry instant in UTC.
	#[serde(with = "time::serde::rfc3339")]
	pub expiry: OffsetDateTime,
}
impl SignedAsset {
	/// Returns the signed href.
	pub fn href(&self) -> &str {
		&self.asset.href
	}

	/// Returns `true` once `now` reaches the expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expiry
	}

	/// Returns `true` if the credential expires within `window` of `now`.
	pub fn expires_within(&self, window: Duration, now: OffsetDateTime) -> bool {
		self.expiry - now <= window
	}
}
impl AsRef<Asset> for SignedAsset {
	fn as_ref(&self) -> &Asset {
		&self.asset
	}
}

/// Item asset slot: either the record as published or its signed counterpart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemAsset {
	/// Signed record carrying an expiry.
	Signed(SignedAsset),
	/// Record as published by the catalog.
	Unsigned(Asset),
}
impl ItemAsset {
	/// Returns the underlying record for either variant.
	pub fn asset(&self) -> &Asset {
		match self {
			Self::Signed(signed) => &signed.asset,
			Self::Unsigned(asset) => asset,
		}
	}

	/// Returns the href for either variant.
	pub fn href(&self) -> &str {
		&self.asset().href
	}

	/// Returns the credential expiry for signed slots.
	pub fn expiry(&self) -> Option<OffsetDateTime> {
		match self {
			Self::Signed(signed) => Some(signed.expiry),
			Self::Unsigned(_) => None,
		}
	}

	/// Returns `true` for signed slots.
	pub fn is_signed(&self) -> bool {
		matches!(self, Self::Signed(_))
	}
}
impl From<Asset> for ItemAsset {
	fn from(asset: Asset) -> Self {
		Self::Unsigned(asset)
	}
}
impl From<SignedAsset> for ItemAsset {
	fn from(signed: SignedAsset) -> Self {
		Self::Signed(signed)
	}
}

/// STAC item reduced to the fields signing touches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
	/// Item identifier.
	pub id: String,
	/// Owning collection identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub collection: Option<String>,
	/// Assets keyed by name.
	#[serde(default)]
	pub assets: BTreeMap<String, ItemAsset>,
}
impl Item {
	/// Creates an item without assets.
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into(), collection: None, assets: BTreeMap::new() }
	}

	/// Sets the owning collection.
	pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
		self.collection = Some(collection.into());

		self
	}

	/// Inserts or replaces an asset.
	pub fn with_asset(mut self, key: impl Into<String>, asset: impl Into<ItemAsset>) -> Self {
		self.assets.insert(key.into(), asset.into());

		self
	}

	/// Looks up an asset by key.
	pub fn asset(&self, key: &str) -> Option<&ItemAsset> {
		self.assets.get(key)
	}

	/// Returns `true` when every asset has been signed.
	pub fn is_fully_signed(&self) -> bool {
		self.assets.values().all(ItemAsset::is_signed)
	}

	/// Earliest credential expiry across signed assets.
	pub fn earliest_expiry(&self) -> Option<OffsetDateTime> {
		self.assets.values().filter_map(ItemAsset::expiry).min()
	}
}
