//! Signer-level error types shared across classification, token fetches, and configuration.

// self
use crate::_prelude::*;

/// Signer-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical signer error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The asset href is not a well-formed absolute URL.
	#[error("Asset href `{href}` is not a valid URL.")]
	InvalidReference {
		/// Offending href.
		href: String,
		/// Underlying parsing failure, absent when the URL parsed but carries no host.
		#[source]
		source: Option<url::ParseError>,
	},
	/// The href is on the storage domain but lacks a recoverable account or container.
	#[error("Asset href `{href}` did not contain a {component}.")]
	MalformedHref {
		/// Missing component label (`storage/account` or `container`).
		component: &'static str,
		/// Offending href.
		href: String,
	},
	/// The signing endpoint failed or returned an unusable payload.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	pub(crate) fn invalid_reference(href: &str, source: Option<url::ParseError>) -> Self {
		Self::InvalidReference { href: href.to_owned(), source }
	}

	pub(crate) fn malformed_href(component: &'static str, href: &str) -> Self {
		Self::MalformedHref { component, href: href.to_owned() }
	}
}

/// Configuration and validation failures raised while assembling a signer.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// SAS endpoint URL cannot be parsed.
	#[error("SAS endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// SAS endpoint uses a scheme other than http(s) or cannot carry path segments.
	#[error("SAS endpoint must be an http(s) base URL: {url}.")]
	UnsupportedEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Storage domain suffix is empty after normalization.
	#[error("Storage domain must not be empty.")]
	EmptyStorageDomain,
	/// Safety margin must not be negative.
	#[error("Safety margin must not be negative.")]
	NegativeSafetyMargin,
	/// Subscription key is empty or whitespace.
	#[error("Subscription key must not be blank.")]
	BlankSubscriptionKey,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures talking to the SAS signing endpoint; callers may retry, nothing is retried here.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Endpoint answered with a non-success status.
	#[error("SAS endpoint returned HTTP {status}: {body}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
		/// Truncated response body for diagnostics.
		body: String,
	},
	/// Response body omitted the token or returned it empty.
	#[error("SAS endpoint response is missing the token.")]
	MissingToken,
	/// Response body omitted the signed href or returned it empty.
	#[error("SAS endpoint response is missing the signed href.")]
	MissingHref,
	/// Response body omitted the `msft:expiry` field.
	#[error("SAS endpoint response is missing msft:expiry.")]
	MissingExpiry,
	/// The `msft:expiry` value is not an ISO-8601 offset datetime.
	#[error("SAS endpoint returned an unparsable expiry `{value}`.")]
	InvalidExpiry {
		/// Raw expiry string.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: time::error::Parse,
	},
	/// The `msft:expiry` value parsed but has no UTC representation.
	#[error("SAS endpoint returned an expiry `{value}` outside the supported UTC range.")]
	ExpiryOutOfRange {
		/// Raw expiry string.
		value: String,
	},
	/// Endpoint responded with malformed JSON.
	#[error("SAS endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Network-level failure (DNS, TCP, TLS, timeout).
	#[error("Network error occurred while calling the SAS endpoint.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl SigningError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Returns `true` when a later attempt may succeed without changing inputs.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Transport { .. } => true,
			Self::Status { status, .. } => *status == 429 || *status >= 500,
			_ => false,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for SigningError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}
