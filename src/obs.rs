//! Optional observability helpers for signing operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `stac_signer.sign` with the `op` and `stage`
//!   fields, plus debug events whenever a container token is refreshed.
//! - Enable `metrics` to increment the `stac_signer_sign_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and `stac_signer_token_refresh_total`
//!   for every cache refresh.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Signing operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignOp {
	/// A single asset passed through [`AssetSigner`](crate::signer::AssetSigner).
	Asset,
	/// Every asset of one item.
	Item,
	/// A batch of items.
	Collection,
	/// A container token request against the SAS API.
	TokenFetch,
	/// A direct `/sign` request against the SAS API.
	HrefSign,
}
impl SignOp {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignOp::Asset => "asset",
			SignOp::Item => "item",
			SignOp::Collection => "collection",
			SignOp::TokenFetch => "token_fetch",
			SignOp::HrefSign => "href_sign",
		}
	}
}
impl Display for SignOp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignOutcome {
	/// Entry to a signing helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl SignOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignOutcome::Attempt => "attempt",
			SignOutcome::Success => "success",
			SignOutcome::Failure => "failure",
		}
	}
}
impl Display for SignOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the success/failure outcome matching `result`.
pub fn record_result<T, E>(op: SignOp, result: &Result<T, E>) {
	match result {
		Ok(_) => record_sign_outcome(op, SignOutcome::Success),
		Err(_) => record_sign_outcome(op, SignOutcome::Failure),
	}
}
