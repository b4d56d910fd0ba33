mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use common::{ScriptedFetcher, blob_asset, build_reqwest_test_signer, token_body};
use stac_signer::{
	asset::Asset,
	cache::TokenCache,
	error::{Error, SigningError},
	signer::AssetSigner,
	storage::{StorageCoordinate, UrlClassifier},
	token::{SasToken, TokenState},
};

#[tokio::test]
async fn sign_appends_token_and_expiry() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let expiry = OffsetDateTime::now_utc() + Duration::minutes(30);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token/storage1/container1");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("tkey", expiry));
		})
		.await;
	let (signer, _cache) = build_reqwest_test_signer(&server.base_url(), None);
	let asset = blob_asset("storage1", "container1", "asset1.tif");
	let signed = signer.sign(&asset).await?;

	assert_eq!(signed.href(), "https://storage1.blob.core.windows.net/container1/asset1.tif?tkey");
	assert_eq!(signed.expiry, expiry);
	assert_eq!(signed.asset.title, asset.title);
	assert_eq!(signed.asset.description, asset.description);
	assert_eq!(signed.asset.media_type, asset.media_type);
	assert_eq!(signed.asset.roles, asset.roles);

	mock.assert_async().await;

	Ok(())
}

#[tokio::test]
async fn sign_sends_subscription_key_when_configured() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/token/storage1/container1")
				.query_param("subscription-key", "pc-key");
			then.status(200).header("content-type", "application/json").body(token_body(
				"keyed",
				OffsetDateTime::now_utc() + Duration::minutes(30),
			));
		})
		.await;
	let (signer, _cache) = build_reqwest_test_signer(&server.base_url(), Some("pc-key"));
	let signed = signer.sign(&blob_asset("storage1", "container1", "asset1.tif")).await?;

	assert!(signed.href().ends_with("?keyed"));

	mock.assert_async().await;

	Ok(())
}

#[tokio::test]
async fn assets_in_one_container_share_a_single_fetch() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token/storage1/container1");
			then.status(200).header("content-type", "application/json").body(token_body(
				"shared",
				OffsetDateTime::now_utc() + Duration::minutes(30),
			));
		})
		.await;
	let (signer, cache) = build_reqwest_test_signer(&server.base_url(), None);
	let first = signer.sign(&blob_asset("storage1", "container1", "asset1.tif")).await?;
	let second = signer.sign(&blob_asset("storage1", "container1", "asset2.tif")).await?;

	assert!(first.href().ends_with("asset1.tif?shared"));
	assert!(second.href().ends_with("asset2.tif?shared"));
	assert_eq!(cache.metrics().refreshes(), 1);
	assert_eq!(cache.metrics().hits(), 1);

	mock.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn assets_in_different_containers_fetch_independently() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let expiry = OffsetDateTime::now_utc() + Duration::minutes(30);
	let first_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token/storage1/container1");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("token-c1", expiry));
		})
		.await;
	let second_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token/storage2/container2");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("token-c2", expiry));
		})
		.await;
	let (signer, cache) = build_reqwest_test_signer(&server.base_url(), None);
	let first = signer.sign(&blob_asset("storage1", "container1", "asset1.tif")).await?;
	let second = signer.sign(&blob_asset("storage2", "container2", "asset1.tif")).await?;

	assert!(first.href().ends_with("?token-c1"));
	assert!(second.href().ends_with("?token-c2"));
	assert_eq!(cache.len(), 2);

	first_mock.assert_calls_async(1).await;
	second_mock.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn resigning_a_signed_asset_keeps_one_credential() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token/storage1/container1");
			then.status(200).header("content-type", "application/json").body(token_body(
				"token1",
				OffsetDateTime::now_utc() + Duration::minutes(30),
			));
		})
		.await;
	let (signer, _cache) = build_reqwest_test_signer(&server.base_url(), None);
	let first = signer.sign(&blob_asset("storage1", "container1", "asset1.tif")).await?;
	let second = signer.sign(&first.asset).await?;

	assert_eq!(second.href().matches("token1").count(), 1);
	assert_eq!(second.href(), first.href());

	mock.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn foreign_hrefs_pass_through_without_requests() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET);
			then.status(200).header("content-type", "application/json").body(token_body(
				"unused",
				OffsetDateTime::now_utc() + Duration::minutes(30),
			));
		})
		.await;
	let (signer, cache) = build_reqwest_test_signer(&server.base_url(), None);
	let asset = Asset::new("https://storage1.not.a.blob.storage/container1/asset1.tif?keep=1");
	let before = OffsetDateTime::now_utc();
	let signed = signer.sign(&asset).await?;

	assert_eq!(signed.href(), asset.href);
	assert!(signed.expiry >= before + Duration::days(364));
	assert!(cache.is_empty());

	mock.assert_calls_async(0).await;

	Ok(())
}

#[tokio::test]
async fn malformed_storage_hrefs_are_rejected_before_fetching() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET);
			then.status(500);
		})
		.await;
	let (signer, _cache) = build_reqwest_test_signer(&server.base_url(), None);
	let no_container = signer
		.sign(&Asset::new("https://storage1.blob.core.windows.net/asset1.tif"))
		.await
		.expect_err("Href without container should fail.");
	let no_account = signer
		.sign(&Asset::new("https://blob.core.windows.net/container1/asset1.tif"))
		.await
		.expect_err("Href without account should fail.");
	let invalid = signer
		.sign(&Asset::new("not a url"))
		.await
		.expect_err("Unparsable href should fail.");

	assert!(matches!(no_container, Error::MalformedHref { .. }));
	assert!(no_container.to_string().contains("container"));
	assert!(matches!(no_account, Error::MalformedHref { .. }));
	assert!(no_account.to_string().contains("storage"));
	assert!(matches!(invalid, Error::InvalidReference { .. }));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn endpoint_failure_is_not_cached() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token/storage1/container1");
			then.status(404).body("container not registered");
		})
		.await;
	let (signer, cache) = build_reqwest_test_signer(&server.base_url(), None);
	let asset = blob_asset("storage1", "container1", "asset1.tif");
	let key = StorageCoordinate::new("storage1", "container1");
	let err = signer.sign(&asset).await.expect_err("404 should surface as a signing error.");

	assert!(matches!(err, Error::Signing(SigningError::Status { status: 404, .. })));
	assert_eq!(cache.state(&key), TokenState::Absent);

	signer.sign(&asset).await.expect_err("Retry should reach the endpoint again.");

	mock.assert_calls_async(2).await;
	assert_eq!(cache.metrics().failures(), 2);
}

#[tokio::test]
async fn stale_tokens_are_replaced_on_next_sign() -> color_eyre::Result<()> {
	let expired = OffsetDateTime::now_utc() - Duration::minutes(30);
	let fresh = OffsetDateTime::now_utc() + Duration::minutes(30);
	let fetcher = Arc::new(ScriptedFetcher::new(vec![
		Ok(SasToken::new("token1", expired)),
		Ok(SasToken::new("token2", fresh)),
	]));
	let signer = <AssetSigner<ScriptedFetcher>>::with_fetcher(
		UrlClassifier::default(),
		Arc::new(TokenCache::default()),
		fetcher.clone(),
	);
	let first = signer.sign(&blob_asset("storage1", "container1", "asset1.tif")).await?;

	assert!(first.href().ends_with("?token1"));
	assert_eq!(first.expiry, expired);

	let second = signer.sign(&first.asset).await?;

	assert!(!second.href().contains("token1"));
	assert!(second.href().ends_with("asset1.tif?token2"));
	assert_eq!(second.expiry, fresh);
	assert_eq!(fetcher.calls(), 2);

	Ok(())
}

#[tokio::test]
async fn tokens_inside_the_safety_margin_trigger_one_refresh() -> color_eyre::Result<()> {
	let now = OffsetDateTime::now_utc();
	let fetcher = Arc::new(ScriptedFetcher::new(vec![
		Ok(SasToken::new("closing", now + Duration::minutes(2))),
		Ok(SasToken::new("renewed", now + Duration::minutes(45))),
	]));
	let cache = Arc::new(TokenCache::new(Duration::minutes(5)));
	let signer = <AssetSigner<ScriptedFetcher>>::with_fetcher(
		UrlClassifier::default(),
		cache.clone(),
		fetcher.clone(),
	);

	signer.sign(&blob_asset("storage1", "container1", "a.tif")).await?;

	let renewed = signer.sign(&blob_asset("storage1", "container1", "b.tif")).await?;
	let reused = signer.sign(&blob_asset("storage1", "container1", "c.tif")).await?;

	assert!(renewed.href().ends_with("?renewed"));
	assert!(reused.href().ends_with("?renewed"));
	assert_eq!(fetcher.calls(), 2);
	assert_eq!(fetcher.requested(), vec![StorageCoordinate::new("storage1", "container1"); 2]);
	assert_eq!(cache.state(&StorageCoordinate::new("storage1", "container1")), TokenState::Valid);

	Ok(())
}

#[tokio::test]
async fn signers_sharing_a_cache_share_tokens() -> color_eyre::Result<()> {
	let fetcher = Arc::new(ScriptedFetcher::new(vec![Ok(SasToken::new(
		"shared",
		OffsetDateTime::now_utc() + Duration::minutes(30),
	))]));
	let cache = Arc::new(TokenCache::default());
	let first = <AssetSigner<ScriptedFetcher>>::with_fetcher(
		UrlClassifier::default(),
		cache.clone(),
		fetcher.clone(),
	);
	let second = first.clone();
	let asset_a = blob_asset("storage1", "container1", "a.tif");
	let asset_b = blob_asset("storage1", "container1", "b.tif");
	let (a, b) = tokio::join!(first.sign(&asset_a), second.sign(&asset_b));

	assert!(a?.href().ends_with("?shared"));
	assert!(b?.href().ends_with("?shared"));
	assert_eq!(fetcher.calls(), 1);

	Ok(())
}
