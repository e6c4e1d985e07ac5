//! Turns validated certificate synopses into a Web of Trust [`Network`].
//!
//! Parsing certificates and checking signatures cryptographically happen
//! upstream; this crate applies the remaining acceptance rules (signature
//! types, validity windows, issuer revocation and expiry, algorithm policy)
//! and emits one edge component per accepted signature.
//!
//! [`Network`]: wot_core::Network

pub mod error;
pub mod factory;
pub mod policy;
pub mod record;
pub mod verify;

pub use error::CertsError;
pub use factory::build_network;
pub use policy::SignaturePolicy;
pub use record::{
    records_from_json, CertificateRecord, KeyValidity, RevocationReason, RevocationRecord,
    SignatureRecord, SignatureType, TrustSignature, UserIdRecord,
};
pub use verify::{check_signature, Rejection};
