//! Blob-storage href classification.
//!
//! Storage hrefs follow `https://{account}.{domain}/{container}/{blob...}`, so whether an asset
//! needs a credential (and which one) is decided from the URL alone, without a network round
//! trip. Hrefs outside the storage domain are treated as public.

// self
use crate::_prelude::*;

/// Azure Blob Storage domain used when no override is configured.
pub const DEFAULT_STORAGE_DOMAIN: &str = "blob.core.windows.net";

/// Account + container pair identifying one SAS token scope; doubles as the cache key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StorageCoordinate {
	/// Storage account (the host label preceding the storage domain).
	pub account: String,
	/// Container (the first path segment).
	pub container: String,
}
impl StorageCoordinate {
	/// Creates a coordinate from its parts.
	pub fn new(account: impl Into<String>, container: impl Into<String>) -> Self {
		Self { account: account.into(), container: container.into() }
	}
}
impl Display for StorageCoordinate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}/{}", self.account, self.container)
	}
}

/// Result of classifying an href.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
	/// The href is outside the storage domain and needs no credential.
	NotApplicable,
	/// The href lives in blob storage under the given coordinate.
	Storage(StorageCoordinate),
}

/// Decides whether an href needs signing and extracts its storage coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlClassifier {
	domain: String,
}
impl UrlClassifier {
	/// Creates a classifier for the provided storage domain (a leading dot is optional).
	pub fn new(domain: impl AsRef<str>) -> Self {
		Self { domain: normalize_domain(domain.as_ref()) }
	}

	/// Returns the normalized storage domain (no leading dot, lowercase).
	pub fn domain(&self) -> &str {
		&self.domain
	}

	/// Classifies an absolute href.
	pub fn classify(&self, href: &str) -> Result<Classification> {
		let url = Url::parse(href).map_err(|e| Error::invalid_reference(href, Some(e)))?;

		self.classify_url(&url, href)
	}

	fn classify_url(&self, url: &Url, href: &str) -> Result<Classification> {
		let host = url.host_str().ok_or_else(|| Error::invalid_reference(href, None))?;
		let host = host.to_ascii_lowercase();

		if host == self.domain {
			return Err(Error::malformed_href("storage/account", href));
		}

		let Some(account) = host
			.strip_suffix(self.domain.as_str())
			.and_then(|prefix| prefix.strip_suffix('.'))
		else {
			return Ok(Classification::NotApplicable);
		};

		if account.is_empty() {
			return Err(Error::malformed_href("storage/account", href));
		}

		let mut segments = url.path_segments().into_iter().flatten();
		let container = segments.next().filter(|segment| !segment.is_empty());
		let blob = segments.next().filter(|segment| !segment.is_empty());

		match (container, blob) {
			(Some(container), Some(_)) =>
				Ok(Classification::Storage(StorageCoordinate::new(account, container))),
			_ => Err(Error::malformed_href("container", href)),
		}
	}
}
impl Default for UrlClassifier {
	fn default() -> Self {
		Self::new(DEFAULT_STORAGE_DOMAIN)
	}
}

pub(crate) fn normalize_domain(domain: &str) -> String {
	domain.trim().trim_start_matches('.').to_ascii_lowercase()
}
