// self
use crate::obs::{HandshakeStep, StepOutcome};

/// Records a step outcome via the global metrics recorder (when enabled).
pub fn record_step_outcome(step: HandshakeStep, outcome: StepOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_broker_step_total",
			"step" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome);
	}
}

/// Records the attempt-terminal outcome pair for a finished step.
pub fn record_step_result<T, E>(step: HandshakeStep, result: &Result<T, E>) {
	match result {
		Ok(_) => record_step_outcome(step, StepOutcome::Success),
		Err(_) => record_step_outcome(step, StepOutcome::Failure),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_step_outcome_noop_without_metrics() {
		record_step_outcome(HandshakeStep::Profile, StepOutcome::Degraded);
		record_step_result::<(), ()>(HandshakeStep::RequestToken, &Err(()));
	}
}
