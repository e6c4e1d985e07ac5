use serde::{Deserialize, Serialize};

/// Which algorithms a signature may use to be accepted into the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePolicy {
    /// Hash algorithms whose signatures are rejected.
    #[serde(default = "default_rejected_hash_algorithms")]
    pub rejected_hash_algorithms: Vec<String>,
    /// Issuer public-key algorithms whose signatures are rejected.
    #[serde(default)]
    pub rejected_public_key_algorithms: Vec<String>,
}

fn default_rejected_hash_algorithms() -> Vec<String> {
    vec!["MD5".into(), "SHA1".into()]
}

impl Default for SignaturePolicy {
    fn default() -> Self {
        Self {
            rejected_hash_algorithms: default_rejected_hash_algorithms(),
            rejected_public_key_algorithms: Vec::new(),
        }
    }
}

impl SignaturePolicy {
    /// A policy that accepts every algorithm.
    pub fn permissive() -> Self {
        Self {
            rejected_hash_algorithms: Vec::new(),
            rejected_public_key_algorithms: Vec::new(),
        }
    }

    pub fn accepts_hash_algorithm(&self, algorithm: &str) -> bool {
        !contains_ignore_case(&self.rejected_hash_algorithms, algorithm)
    }

    pub fn accepts_public_key_algorithm(&self, algorithm: &str) -> bool {
        !contains_ignore_case(&self.rejected_public_key_algorithms, algorithm)
    }
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(value))
}
