// self
use crate::{_prelude::*, obs::HandshakeStep};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStep<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStep<F> = F;

/// A span builder used by handshake steps.
#[derive(Clone, Debug)]
pub struct StepSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StepSpan {
	/// Creates a new span tagged with the provided step + stage.
	pub fn new(step: HandshakeStep, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth1_broker.step", step = step.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (step, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStep<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning for an absorbed avatar lookup failure.
pub fn note_degraded(step: HandshakeStep, reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(step = step.as_str(), %reason, "Ignoring non-critical lookup failure.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (step, reason);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn degraded_note_accepts_any_display() {
		note_degraded(HandshakeStep::Profile, &"HTTP 404");
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = StepSpan::new(HandshakeStep::Identity, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
