use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Revocation status of a certificate or of a single user-id.
///
/// - `Hard` is effective at every reference time, including times before
///   the revocation was issued (the key is considered compromised).
/// - `Soft(t)` is effective from `t` onwards, inclusive, at second
///   resolution.
/// - `None` is never effective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "since", rename_all = "snake_case")]
pub enum RevocationState {
    #[default]
    None,
    Soft(DateTime<Utc>),
    Hard,
}

impl RevocationState {
    pub fn is_effective(&self, reference_time: DateTime<Utc>) -> bool {
        match self {
            RevocationState::None => false,
            RevocationState::Soft(since) => reference_time.timestamp() >= since.timestamp(),
            RevocationState::Hard => true,
        }
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, RevocationState::Hard)
    }

    pub fn is_soft(&self) -> bool {
        matches!(self, RevocationState::Soft(_))
    }
}

impl fmt::Display for RevocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevocationState::None => write!(f, "not revoked"),
            RevocationState::Soft(since) => write!(f, "soft revoked since {}", since.to_rfc3339()),
            RevocationState::Hard => write!(f, "hard revoked"),
        }
    }
}
