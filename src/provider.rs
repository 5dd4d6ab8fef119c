//! Provider-facing configuration.
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the five
//! HTTPS endpoints a handshake touches, the `User-Agent` the provider expects, and
//! provider quirks (callback confirmation, avatar field name).

pub mod descriptor;

pub use descriptor::*;
