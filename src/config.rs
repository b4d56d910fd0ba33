//! Signer configuration: SAS endpoint, subscription key, storage domain, and cache margin.

pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Planetary Computer SAS API used when no endpoint override is configured.
pub const DEFAULT_SAS_ENDPOINT: &str = "https://planetarycomputer.microsoft.com/api/sas/v1";

/// Validated configuration shared by the SAS client, token cache, and classifier.
#[derive(Clone, PartialEq, Eq)]
pub struct SignerConfig {
	/// Base URL of the SAS API (`/token` and `/sign` are appended).
	pub sas_endpoint: Url,
	/// Optional API subscription key sent as `subscription-key`.
	pub subscription_key: Option<String>,
	/// Storage domain whose subdomains require signing (no leading dot).
	pub storage_domain: String,
	/// Window before expiry in which cached tokens are treated as stale.
	pub safety_margin: Duration,
	/// Per-request timeout applied by the HTTP transport.
	pub request_timeout: Option<std::time::Duration>,
}
impl SignerConfig {
	/// Default cache safety margin.
	pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::minutes(5);
	/// Default HTTP request timeout.
	pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

	/// Returns a builder seeded with defaults.
	pub fn builder() -> SignerConfigBuilder {
		SignerConfigBuilder::default()
	}

	/// Builds the URL for a container token request.
	pub fn token_url(&self, account: &str, container: &str) -> Url {
		let mut url = self.sas_endpoint.clone();

		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().extend(["token", account, container]);
		}

		self.append_subscription_key(url)
	}

	/// Builds the URL for a direct href signing request.
	pub fn sign_url(&self, href: &str) -> Url {
		let mut url = self.sas_endpoint.clone();

		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push("sign");
		}

		url.query_pairs_mut().append_pair("href", href);

		self.append_subscription_key(url)
	}

	fn append_subscription_key(&self, mut url: Url) -> Url {
		if let Some(key) = self.subscription_key.as_deref() {
			url.query_pairs_mut().append_pair("subscription-key", key);
		}

		url
	}
}
impl Debug for SignerConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignerConfig")
			.field("sas_endpoint", &self.sas_endpoint.as_str())
			.field("subscription_key_set", &self.subscription_key.is_some())
			.field("storage_domain", &self.storage_domain)
			.field("safety_margin", &self.safety_margin)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}
