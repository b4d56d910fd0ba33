//! SAS token model, expiry parsing, and cache freshness states.

pub mod secret;

pub use secret::*;

// crates.io
use time::{
	PrimitiveDateTime,
	format_description::well_known::{Iso8601, Rfc3339},
};
// self
use crate::{_prelude::*, error::SigningError};

/// Freshness of a cache slot relative to an instant and a safety margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenState {
	/// No token has been cached for the key yet.
	Absent,
	/// The token stays usable beyond the safety margin.
	Valid,
	/// The token expired or will expire within the safety margin.
	Stale,
}

/// Short-lived container credential issued by the SAS endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SasToken {
	/// Query string granting read access; callers must avoid logging it.
	pub value: TokenSecret,
	/// Expiry instant, always stored in UTC.
	#[serde(with = "time::serde::rfc3339")]
	pub expiry: OffsetDateTime,
}
impl SasToken {
	/// Creates a token, normalizing the expiry to UTC.
	///
	/// An expiry whose UTC form falls outside the supported calendar keeps its original offset;
	/// comparisons are by instant either way.
	pub fn new(value: impl Into<String>, expiry: OffsetDateTime) -> Self {
		Self { value: TokenSecret::new(value), expiry: to_utc(expiry).unwrap_or(expiry) }
	}

	/// Classifies the token at `now`; stale once `now >= expiry - safety_margin`.
	pub fn state_at(&self, now: OffsetDateTime, safety_margin: Duration) -> TokenState {
		if now < self.expiry - safety_margin { TokenState::Valid } else { TokenState::Stale }
	}

	/// Returns `true` if the token is usable at `now` given the safety margin.
	pub fn is_valid_at(&self, now: OffsetDateTime, safety_margin: Duration) -> bool {
		matches!(self.state_at(now, safety_margin), TokenState::Valid)
	}
}
impl Debug for SasToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SasToken")
			.field("value", &"<redacted>")
			.field("expiry", &self.expiry)
			.finish()
	}
}

/// Parses an ISO-8601 offset datetime (as emitted in `msft:expiry`) and normalizes it to UTC.
pub fn parse_expiry(raw: &str) -> Result<OffsetDateTime, SigningError> {
	let raw = raw.trim();
	let parsed = match OffsetDateTime::parse(raw, &Rfc3339) {
		Ok(moment) => moment,
		Err(_) => OffsetDateTime::parse(raw, &Iso8601::DEFAULT)
			.map_err(|source| SigningError::InvalidExpiry { value: raw.to_owned(), source })?,
	};

	to_utc(parsed).ok_or_else(|| SigningError::ExpiryOutOfRange { value: raw.to_owned() })
}

/// Shifts `moment` to UTC, or `None` when the shifted date leaves the supported range.
fn to_utc(moment: OffsetDateTime) -> Option<OffsetDateTime> {
	let offset = Duration::seconds(i64::from(moment.offset().whole_seconds()));
	let local = PrimitiveDateTime::new(moment.date(), moment.time());

	local.checked_sub(offset).map(PrimitiveDateTime::assume_utc)
}
