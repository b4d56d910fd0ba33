//! Validating builder for [`SignerConfig`].

// self
use crate::{
	_prelude::*,
	config::{DEFAULT_SAS_ENDPOINT, SignerConfig},
	error::ConfigError,
	storage::{self, DEFAULT_STORAGE_DOMAIN},
};

/// Builder for [`SignerConfig`] values.
#[derive(Clone, Debug)]
pub struct SignerConfigBuilder {
	/// SAS API base URL; the Planetary Computer endpoint is used when unset.
	pub sas_endpoint: Option<Url>,
	/// Optional subscription key.
	pub subscription_key: Option<String>,
	/// Storage domain suffix; a leading dot is accepted and stripped.
	pub storage_domain: String,
	/// Cache safety margin.
	pub safety_margin: Duration,
	/// HTTP request timeout, `None` to rely on the transport default.
	pub request_timeout: Option<std::time::Duration>,
}
impl SignerConfigBuilder {
	/// Sets the SAS API base URL.
	pub fn sas_endpoint(mut self, url: Url) -> Self {
		self.sas_endpoint = Some(url);

		self
	}

	/// Sets the subscription key sent with every request.
	pub fn subscription_key(mut self, key: impl Into<String>) -> Self {
		self.subscription_key = Some(key.into());

		self
	}

	/// Overrides the storage domain used for classification.
	pub fn storage_domain(mut self, domain: impl Into<String>) -> Self {
		self.storage_domain = domain.into();

		self
	}

	/// Overrides the cache safety margin (defaults to five minutes).
	pub fn safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin = margin;

		self
	}

	/// Overrides the HTTP request timeout (defaults to 30 seconds).
	pub fn request_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SignerConfig, ConfigError> {
		let sas_endpoint = match self.sas_endpoint {
			Some(url) => url,
			None => Url::parse(DEFAULT_SAS_ENDPOINT)
				.map_err(|source| ConfigError::InvalidEndpoint { source })?,
		};

		validate_endpoint(&sas_endpoint)?;

		let storage_domain = storage::normalize_domain(&self.storage_domain);

		if storage_domain.is_empty() {
			return Err(ConfigError::EmptyStorageDomain);
		}
		if self.safety_margin.is_negative() {
			return Err(ConfigError::NegativeSafetyMargin);
		}
		if self.subscription_key.as_deref().is_some_and(|key| key.trim().is_empty()) {
			return Err(ConfigError::BlankSubscriptionKey);
		}

		Ok(SignerConfig {
			sas_endpoint,
			subscription_key: self.subscription_key,
			storage_domain,
			safety_margin: self.safety_margin,
			request_timeout: self.request_timeout,
		})
	}
}
impl Default for SignerConfigBuilder {
	fn default() -> Self {
		Self {
			sas_endpoint: None,
			subscription_key: None,
			storage_domain: DEFAULT_STORAGE_DOMAIN.into(),
			safety_margin: SignerConfig::DEFAULT_SAFETY_MARGIN,
			request_timeout: Some(SignerConfig::DEFAULT_REQUEST_TIMEOUT),
		}
	}
}

/// Parses and validates a SAS endpoint string.
pub fn parse_sas_endpoint(raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { source })?;

	validate_endpoint(&url)?;

	Ok(url)
}

fn validate_endpoint(url: &Url) -> Result<(), ConfigError> {
	if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() {
		Ok(())
	} else {
		Err(ConfigError::UnsupportedEndpoint { url: url.to_string() })
	}
}
