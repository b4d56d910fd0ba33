//! SAS query material that never reaches a log line.

// self
use crate::_prelude::*;

/// SAS query string (`st=..&se=..&sig=..`) with redacted formatting.
///
/// Surrounding whitespace and a leading `?` are dropped on construction, including when the value
/// is deserialized, so the stored text can be appended to a base href as-is.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a SAS query string.
	pub fn new(value: impl Into<String>) -> Self {
		let value = value.into();
		let query = value.trim().trim_start_matches('?');

		if query.len() == value.len() { Self(value) } else { Self(query.to_owned()) }
	}

	/// Raw query string. Keep it out of logs and error messages.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `true` when nothing is left after normalization.
	pub fn is_blank(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl From<TokenSecret> for String {
	fn from(secret: TokenSecret) -> Self {
		secret.0
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret(<{} redacted bytes>)", self.0.len())
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
