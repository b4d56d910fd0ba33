//! SAS signing for STAC assets hosted on Azure Blob Storage, with per-container token caching,
//! singleflight refresh and expiry-aware reuse.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod asset;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod obs;
pub mod signer;
pub mod storage;
pub mod token;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
