use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::identifier::Identifier;
use crate::revocation::RevocationState;

/// Synopsis of a certificate: everything the trust computation needs to
/// know about it, stripped of key material.
///
/// Two nodes are equal when their identifiers are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    identifier: Identifier,
    #[serde(default)]
    expiration_time: Option<DateTime<Utc>>,
    #[serde(default)]
    revocation: RevocationState,
    #[serde(default)]
    user_ids: BTreeMap<String, RevocationState>,
}

impl Node {
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        Self {
            identifier: identifier.into(),
            expiration_time: None,
            revocation: RevocationState::None,
            user_ids: BTreeMap::new(),
        }
    }

    pub fn with_expiration(mut self, expiration_time: DateTime<Utc>) -> Self {
        self.expiration_time = Some(expiration_time);
        self
    }

    pub fn with_revocation(mut self, revocation: RevocationState) -> Self {
        self.revocation = revocation;
        self
    }

    pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
        self.with_revoked_user_id(user_id, RevocationState::None)
    }

    pub fn with_revoked_user_id(
        mut self,
        user_id: impl Into<String>,
        revocation: RevocationState,
    ) -> Self {
        self.user_ids.insert(user_id.into(), revocation);
        self
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.expiration_time
    }

    pub fn revocation(&self) -> RevocationState {
        self.revocation
    }

    /// All user-ids with their individual revocation state.
    pub fn user_ids(&self) -> &BTreeMap<String, RevocationState> {
        &self.user_ids
    }

    pub fn has_user_id(&self, user_id: &str) -> bool {
        self.user_ids.contains_key(user_id)
    }

    pub fn user_id_revocation(&self, user_id: &str) -> Option<RevocationState> {
        self.user_ids.get(user_id).copied()
    }

    /// A certificate is expired once the reference time reaches its
    /// expiration time.
    pub fn is_expired(&self, reference_time: DateTime<Utc>) -> bool {
        self.expiration_time
            .is_some_and(|expiration| expiration <= reference_time)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.user_ids.keys().next() {
            Some(user_id) => write!(f, "{} ({})", self.identifier, user_id),
            None => write!(f, "{}", self.identifier),
        }
    }
}
