//! Reqwest-backed client for the SAS API (`/token/{account}/{container}` and `/sign?href=`).

// self
use crate::{
	_prelude::*,
	config::SignerConfig,
	error::{ConfigError, SigningError},
	fetch::{FetchFuture, SignedLink, TokenFetcher},
	http::{self, ReqwestHttpClient},
	obs::{self, SignOp, SignOutcome, SignSpan},
	storage::StorageCoordinate,
	token::{self, SasToken, TokenSecret},
};

#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	token: Option<TokenSecret>,
	#[serde(default, rename = "msft:expiry")]
	expiry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
	#[serde(default)]
	href: Option<String>,
	#[serde(default, rename = "msft:expiry")]
	expiry: Option<String>,
}

/// Client for the SAS API; implements [`TokenFetcher`].
#[derive(Clone, Debug)]
pub struct SasClient {
	http_client: ReqwestHttpClient,
	config: Arc<SignerConfig>,
}
impl SasClient {
	/// Creates a client with a transport built from the configuration.
	pub fn new(config: &SignerConfig) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::from_config(config)?;

		Ok(Self::with_http_client(config, http_client))
	}

	/// Creates a client reusing a caller-provided transport.
	pub fn with_http_client(config: &SignerConfig, http_client: ReqwestHttpClient) -> Self {
		Self { http_client, config: Arc::new(config.clone()) }
	}

	/// Returns the configuration the client was built with.
	pub fn config(&self) -> &SignerConfig {
		&self.config
	}

	/// Requests a container token: `GET {endpoint}/token/{account}/{container}`.
	pub async fn fetch_token(
		&self,
		coordinate: &StorageCoordinate,
	) -> Result<SasToken, SigningError> {
		const OP: SignOp = SignOp::TokenFetch;

		let span = SignSpan::new(OP, "fetch_token");

		span.record_coordinate(coordinate);
		obs::record_sign_outcome(OP, SignOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.config.token_url(&coordinate.account, &coordinate.container);
				let response = self.http_client.get(url).await?;
				let payload: TokenResponse = http::decode_json(&response)?;
				let value = payload
					.token
					.filter(|token| !token.is_blank())
					.ok_or(SigningError::MissingToken)?;
				let expiry = token::parse_expiry(
					payload.expiry.as_deref().ok_or(SigningError::MissingExpiry)?,
				)?;

				Ok(SasToken { value, expiry })
			})
			.await;

		obs::record_result(OP, &result);

		result
	}

	/// Signs a single href server-side: `GET {endpoint}/sign?href={href}`.
	///
	/// Bypasses the token cache entirely; every call is one request.
	pub async fn sign_href(&self, href: &str) -> Result<SignedLink, SigningError> {
		const OP: SignOp = SignOp::HrefSign;

		let span = SignSpan::new(OP, "sign_href");

		obs::record_sign_outcome(OP, SignOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.http_client.get(self.config.sign_url(href)).await?;
				let payload: SignResponse = http::decode_json(&response)?;
				let href = payload
					.href
					.filter(|href| !href.trim().is_empty())
					.ok_or(SigningError::MissingHref)?;
				let expiry = token::parse_expiry(
					payload.expiry.as_deref().ok_or(SigningError::MissingExpiry)?,
				)?;

				Ok(SignedLink { href, expiry })
			})
			.await;

		obs::record_result(OP, &result);

		result
	}
}
impl TokenFetcher for SasClient {
	fn fetch<'a>(&'a self, coordinate: &'a StorageCoordinate) -> FetchFuture<'a, SasToken> {
		Box::pin(async move { self.fetch_token(coordinate).await.map_err(Error::from) })
	}
}
