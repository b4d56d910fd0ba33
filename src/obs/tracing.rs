// self
use crate::{_prelude::*, obs::SignOp, storage::StorageCoordinate};

/// Future returned by [`SignSpan::instrument`]; the bare future when `tracing` is off.
#[cfg(feature = "tracing")]
pub type InstrumentedSign<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`SignSpan::instrument`]; the bare future when `tracing` is off.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedSign<F> = F;

/// `stac_signer.sign` span carrying the operation, its stage and, once known, the container.
#[derive(Clone, Debug)]
pub struct SignSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl SignSpan {
	/// Opens a span for `op` at `stage`; account and container start out empty.
	pub fn new(op: SignOp, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"stac_signer.sign",
					op = op.as_str(),
					stage,
					account = tracing::field::Empty,
					container = tracing::field::Empty,
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Fills in the storage account and container fields.
	pub fn record_coordinate(&self, coordinate: &StorageCoordinate) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("account", coordinate.account.as_str());
			self.span.record("container", coordinate.container.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		let _ = coordinate;
	}

	/// Runs `fut` inside the span; the span is entered per poll only.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedSign<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
