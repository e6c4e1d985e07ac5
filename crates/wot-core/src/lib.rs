//! Web of Trust core: the data model of an OpenPGP trust network.
//!
//! This crate provides:
//! - [`Identifier`], [`TrustDepth`], [`RegexSet`] and [`RevocationState`]: value types.
//! - [`Node`]: a certificate synopsis (expiry, revocation, user-ids).
//! - [`EdgeComponent`] and [`Edge`]: delegations and certifications between two nodes.
//! - [`Network`] and [`NetworkBuilder`]: the immutable trust graph at a reference time.
//! - [`Root`], [`Roots`] and [`AuthenticationLevel`]: trust anchors and required amounts.

pub mod depth;
pub mod edge;
pub mod error;
pub mod identifier;
pub mod network;
pub mod node;
pub mod regex_set;
pub mod revocation;
pub mod root;

/// Trust amount of a fully trusted introducer or binding.
pub const FULLY_TRUSTED: u8 = 120;

/// Trust amount of a partially trusted introducer or binding.
pub const PARTIALLY_TRUSTED: u8 = 40;

// Re-exports for convenience.
pub use depth::TrustDepth;
pub use edge::{ComponentKind, Edge, EdgeComponent};
pub use error::CoreError;
pub use identifier::Identifier;
pub use network::{Network, NetworkBuilder};
pub use node::Node;
pub use regex_set::RegexSet;
pub use revocation::RevocationState;
pub use root::{AuthenticationLevel, Root, Roots};
