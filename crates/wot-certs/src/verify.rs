use chrono::{DateTime, Utc};

use wot_core::RevocationState;

use crate::policy::SignaturePolicy;
use crate::record::{CertificateRecord, SignatureRecord, SignatureType};

/// Why a signature was left out of the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("cryptographic verification failed")]
    NotVerified,

    #[error("{signature_type} signature cannot {purpose}")]
    WrongType {
        signature_type: SignatureType,
        purpose: &'static str,
    },

    #[error("signature has critical unknown subpackets or notations")]
    CriticalUnknown,

    #[error("signature created at {0} is newer than the reference time")]
    NotYetValid(DateTime<Utc>),

    #[error("signature expired at {0}")]
    Expired(DateTime<Utc>),

    #[error("issuer is hard revoked")]
    IssuerHardRevoked,

    #[error("signature was made after the issuer was revoked at {0}")]
    IssuerSoftRevoked(DateTime<Utc>),

    #[error("signature was made after the issuer expired at {0}")]
    IssuerExpired(DateTime<Utc>),

    #[error("signature predates the issuer key")]
    PredatesIssuer,

    #[error("signature predates the signed key")]
    PredatesTarget,

    #[error("hash algorithm {0} is rejected by policy")]
    RejectedHashAlgorithm(String),

    #[error("public-key algorithm {0} is rejected by policy")]
    RejectedPublicKeyAlgorithm(String),

    #[error("user-id {0:?} is not present on the signed certificate")]
    UnknownUserId(String),
}

/// Decide whether `signature`, found on `signee` and issued by `issuer`,
/// may become an edge at `reference_time`.
pub fn check_signature(
    signature: &SignatureRecord,
    issuer: &CertificateRecord,
    signee: &CertificateRecord,
    policy: &SignaturePolicy,
    reference_time: DateTime<Utc>,
) -> Result<(), Rejection> {
    if !signature.verified {
        return Err(Rejection::NotVerified);
    }
    check_type(signature)?;
    if signature.critical_unknown {
        return Err(Rejection::CriticalUnknown);
    }

    if signature.creation_time > reference_time {
        return Err(Rejection::NotYetValid(signature.creation_time));
    }
    if let Some(expiration) = signature.expiration_time {
        if expiration <= reference_time {
            return Err(Rejection::Expired(expiration));
        }
    }

    match issuer.revocation_state(reference_time) {
        RevocationState::Hard => return Err(Rejection::IssuerHardRevoked),
        RevocationState::Soft(since) if signature.creation_time >= since => {
            return Err(Rejection::IssuerSoftRevoked(since));
        }
        _ => {}
    }
    if let Some(expiration) = issuer.expiration_time() {
        if signature.creation_time >= expiration {
            return Err(Rejection::IssuerExpired(expiration));
        }
    }
    if signature.creation_time < issuer.creation_time {
        return Err(Rejection::PredatesIssuer);
    }

    if !policy.accepts_hash_algorithm(&signature.hash_algorithm) {
        return Err(Rejection::RejectedHashAlgorithm(
            signature.hash_algorithm.clone(),
        ));
    }
    if !policy.accepts_public_key_algorithm(&issuer.public_key_algorithm) {
        return Err(Rejection::RejectedPublicKeyAlgorithm(
            issuer.public_key_algorithm.clone(),
        ));
    }

    if signature.creation_time < signee.creation_time {
        return Err(Rejection::PredatesTarget);
    }
    if let Some(user_id) = &signature.user_id {
        if signee.user_id(user_id).is_none() {
            return Err(Rejection::UnknownUserId(user_id.clone()));
        }
    }
    Ok(())
}

fn check_type(signature: &SignatureRecord) -> Result<(), Rejection> {
    let signature_type = signature.signature_type;
    let revocation = signature_type == SignatureType::CertificationRevocation;
    let fits = match signature.user_id {
        Some(_) => signature_type.is_certification() || revocation,
        None => signature_type == SignatureType::DirectKey || revocation,
    };
    if fits {
        return Ok(());
    }
    let purpose = if signature.user_id.is_some() {
        "certify a user-id"
    } else {
        "delegate trust in a key"
    };
    Err(Rejection::WrongType {
        signature_type,
        purpose,
    })
}
