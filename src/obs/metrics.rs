// self
use crate::{
	obs::{SignOp, SignOutcome},
	storage::StorageCoordinate,
};

/// Records a signing outcome via the global metrics recorder (when enabled).
pub fn record_sign_outcome(op: SignOp, outcome: SignOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"stac_signer_sign_total",
			"op" => op.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (op, outcome);
	}
}

/// Records a cache refresh for a container (metrics counter + debug event when enabled).
pub fn record_token_refresh(coordinate: &StorageCoordinate) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("stac_signer_token_refresh_total").increment(1);
	}
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			account = coordinate.account.as_str(),
			container = coordinate.container.as_str(),
			"Refreshed SAS token."
		);
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = coordinate;
	}
}
