//! Handshake domain types: validated identifiers, secrets, token pairs, and identities.

pub mod credential;
pub mod id;
pub mod identity;
pub mod secret;
pub mod token;

pub use credential::*;
pub use id::*;
pub use identity::*;
pub use secret::*;
pub use token::*;
