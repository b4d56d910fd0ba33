//! Transport primitives for SAS endpoint calls.
//!
//! [`ReqwestHttpClient`] performs the GET requests and captures [`ResponseMetadata`] so failures
//! can be reported with their status and retry hints. Decoding is transport-agnostic:
//! [`decode_json`] turns any [`HttpResponse`] into a typed payload or a
//! [`SigningError`].

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::de::DeserializeOwned;
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
#[cfg(feature = "reqwest")] use crate::{config::SignerConfig, error::ConfigError};
use crate::{_prelude::*, error::SigningError};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Metadata captured from the most recent HTTP response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Buffered HTTP response handed to the decoders.
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
	/// Status and retry hints.
	pub metadata: ResponseMetadata,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Returns `true` for 2xx responses.
	pub fn is_success(&self) -> bool {
		self.metadata.status.is_some_and(|status| (200..300).contains(&status))
	}
}

/// Decodes a JSON payload, mapping non-2xx statuses and malformed bodies to [`SigningError`].
pub fn decode_json<T>(response: &HttpResponse) -> Result<T, SigningError>
where
	T: DeserializeOwned,
{
	let status = response.metadata.status;

	if !response.is_success() {
		return Err(SigningError::Status {
			status: status.unwrap_or_default(),
			retry_after: response.metadata.retry_after,
			body: body_preview(&response.body),
		});
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| SigningError::ResponseParse { source, status })
}

fn body_preview(body: &[u8]) -> String {
	String::from_utf8_lossy(body).trim().chars().take(BODY_PREVIEW_LIMIT).collect()
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// SAS endpoints answer directly, so clients built by [`ReqwestHttpClient::from_config`] never
/// follow redirects and apply the configured request timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured timeout with redirects disabled.
	pub fn from_config(config: &SignerConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none());

		if let Some(timeout) = config.request_timeout {
			builder = builder.timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}

	/// Issues a GET request and buffers the response.
	pub async fn get(&self, url: Url) -> Result<HttpResponse, SigningError> {
		let response = self.0.get(url).send().await?;
		let status = response.status().as_u16();
		let retry_after = parse_retry_after(response.headers());
		let body = response.bytes().await?.to_vec();

		Ok(HttpResponse { metadata: ResponseMetadata { status: Some(status), retry_after }, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
