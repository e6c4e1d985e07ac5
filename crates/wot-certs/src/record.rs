//! Certificate synopses handed over by the certificate parser.
//!
//! Records carry everything needed to decide which signatures become
//! network edges: timestamps, revocations, algorithms, the parser's
//! cryptographic verification outcome. They carry no key material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use wot_core::{Identifier, RevocationState};

fn default_true() -> bool {
    true
}

/// OpenPGP signature types relevant to the web of trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureType {
    DirectKey,
    GenericCertification,
    PersonaCertification,
    CasualCertification,
    PositiveCertification,
    CertificationRevocation,
    #[serde(other)]
    Other,
}

impl SignatureType {
    /// Signature types that certify a user-id binding.
    pub fn is_certification(&self) -> bool {
        matches!(
            self,
            SignatureType::GenericCertification
                | SignatureType::PersonaCertification
                | SignatureType::CasualCertification
                | SignatureType::PositiveCertification
        )
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignatureType::DirectKey => "direct key",
            SignatureType::GenericCertification => "generic certification",
            SignatureType::PersonaCertification => "persona certification",
            SignatureType::CasualCertification => "casual certification",
            SignatureType::PositiveCertification => "positive certification",
            SignatureType::CertificationRevocation => "certification revocation",
            SignatureType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Reason code of a revocation signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationReason {
    NoReason,
    KeyCompromised,
    KeySuperseded,
    KeyRetired,
    UserIdInvalid,
    #[serde(other)]
    Unknown,
}

impl RevocationReason {
    /// Soft reasons say the key or user-id was retired in an orderly way,
    /// so signatures made before the revocation stay meaningful.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            RevocationReason::KeySuperseded
                | RevocationReason::KeyRetired
                | RevocationReason::UserIdInvalid
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRecord {
    pub creation_time: DateTime<Utc>,
    /// A missing reason is treated like a compromised key.
    #[serde(default)]
    pub reason: Option<RevocationReason>,
}

/// Trust signature subpacket values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSignature {
    pub depth: u8,
    pub amount: u8,
}

/// A third-party signature found on a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub issuer: Identifier,
    #[serde(rename = "type")]
    pub signature_type: SignatureType,
    /// The signed user-id; absent for signatures over the key itself.
    #[serde(default)]
    pub user_id: Option<String>,
    pub creation_time: DateTime<Utc>,
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub exportable: bool,
    #[serde(default)]
    pub trust: Option<TrustSignature>,
    #[serde(default)]
    pub regexes: Vec<String>,
    pub hash_algorithm: String,
    /// The signature carries critical subpackets or notations the parser
    /// did not understand.
    #[serde(default)]
    pub critical_unknown: bool,
    /// Outcome of the parser's cryptographic verification.
    #[serde(default = "default_true")]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdRecord {
    pub value: String,
    #[serde(default)]
    pub revocations: Vec<RevocationRecord>,
}

/// Result of the parser's key-flags and expiration calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValidity {
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub fingerprint: Identifier,
    pub creation_time: DateTime<Utc>,
    /// `None` when the parser could not compute key flags or expiration;
    /// such certificates are left out of the network.
    #[serde(default)]
    pub validity: Option<KeyValidity>,
    pub public_key_algorithm: String,
    #[serde(default)]
    pub revocations: Vec<RevocationRecord>,
    #[serde(default)]
    pub user_ids: Vec<UserIdRecord>,
    #[serde(default)]
    pub signatures: Vec<SignatureRecord>,
}

impl CertificateRecord {
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.validity.as_ref().and_then(|v| v.expiration_time)
    }

    /// The certificate's revocation state as known at `reference_time`.
    pub fn revocation_state(&self, reference_time: DateTime<Utc>) -> RevocationState {
        revocation_state(&self.revocations, reference_time)
    }

    pub fn user_id(&self, user_id: &str) -> Option<&UserIdRecord> {
        self.user_ids.iter().find(|u| u.value == user_id)
    }
}

/// Fold revocation signatures into one state. Any hard revocation wins,
/// whatever its timestamp. Otherwise the earliest soft revocation issued
/// at or before `reference_time` applies; later soft revocations are
/// unknown at that time.
pub fn revocation_state(
    revocations: &[RevocationRecord],
    reference_time: DateTime<Utc>,
) -> RevocationState {
    let mut earliest_soft: Option<DateTime<Utc>> = None;
    for revocation in revocations {
        match revocation.reason {
            Some(reason) if reason.is_soft() => {
                if revocation.creation_time > reference_time {
                    continue;
                }
                earliest_soft = Some(match earliest_soft {
                    Some(t) => t.min(revocation.creation_time),
                    None => revocation.creation_time,
                });
            }
            _ => return RevocationState::Hard,
        }
    }
    earliest_soft.map_or(RevocationState::None, RevocationState::Soft)
}

/// Parse a JSON array of certificate records.
pub fn records_from_json(json: &str) -> Result<Vec<CertificateRecord>, crate::CertsError> {
    Ok(serde_json::from_str(json)?)
}
