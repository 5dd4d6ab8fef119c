//! Optional observability helpers for handshake steps.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_broker.step` with the `step` and
//!   `stage` (call site) fields, plus a warning whenever the avatar lookup degrades.
//! - Enable `metrics` to increment the `oauth1_broker_step_total` counter for every
//!   attempt/success/failure/degradation, labeled by `step` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Network steps of the three-legged handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeStep {
	/// Obtaining the unauthorized request token.
	RequestToken,
	/// Exchanging the verified request token for an access token.
	AccessToken,
	/// Resolving the authenticated username.
	Identity,
	/// Best-effort avatar lookup on the user profile.
	Profile,
}
impl HandshakeStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakeStep::RequestToken => "request_token",
			HandshakeStep::AccessToken => "access_token",
			HandshakeStep::Identity => "identity",
			HandshakeStep::Profile => "profile",
		}
	}
}
impl Display for HandshakeStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
	/// Entry to a step.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Failure absorbed locally (avatar lookup only).
	Degraded,
}
impl StepOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepOutcome::Attempt => "attempt",
			StepOutcome::Success => "success",
			StepOutcome::Failure => "failure",
			StepOutcome::Degraded => "degraded",
		}
	}
}
impl Display for StepOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
