use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::identifier::Identifier;
use crate::FULLY_TRUSTED;

/// A certificate trusted a priori, together with how much it is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    #[serde(rename = "fingerprint")]
    pub identifier: Identifier,
    #[serde(default = "default_root_amount")]
    pub amount: u8,
}

fn default_root_amount() -> u8 {
    FULLY_TRUSTED
}

impl Root {
    /// A fully trusted root.
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        Self::with_amount(identifier, FULLY_TRUSTED)
    }

    pub fn with_amount(identifier: impl Into<Identifier>, amount: u8) -> Self {
        Self {
            identifier: identifier.into(),
            amount,
        }
    }

    pub fn is_fully_trusted(&self) -> bool {
        self.amount >= FULLY_TRUSTED
    }
}

/// The set of trust roots, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roots {
    roots: BTreeMap<Identifier, Root>,
}

impl Roots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root, replacing any earlier root with the same identifier.
    pub fn insert(&mut self, root: Root) {
        self.roots.insert(root.identifier.clone(), root);
    }

    pub fn get(&self, identifier: &Identifier) -> Option<&Root> {
        self.roots.get(identifier)
    }

    pub fn is_root(&self, identifier: &Identifier) -> bool {
        self.roots.contains_key(identifier)
    }

    pub fn is_fully_trusted(&self, identifier: &Identifier) -> bool {
        self.get(identifier).is_some_and(Root::is_fully_trusted)
    }

    /// Root identifiers in ascending order.
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.roots.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Root> {
        self.roots.values()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl FromIterator<Root> for Roots {
    fn from_iter<T: IntoIterator<Item = Root>>(iter: T) -> Self {
        let mut roots = Roots::new();
        for root in iter {
            roots.insert(root);
        }
        roots
    }
}

/// Named trust amounts required for authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationLevel {
    /// 40: a third of full trust.
    Partially,
    /// 120: one fully trusted path.
    Fully,
    /// 240: the equivalent of two independent fully trusted paths.
    Doubly,
}

impl AuthenticationLevel {
    pub fn amount(&self) -> u32 {
        match self {
            AuthenticationLevel::Partially => 40,
            AuthenticationLevel::Fully => 120,
            AuthenticationLevel::Doubly => 240,
        }
    }
}

impl fmt::Display for AuthenticationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationLevel::Partially => write!(f, "partially"),
            AuthenticationLevel::Fully => write!(f, "fully"),
            AuthenticationLevel::Doubly => write!(f, "doubly"),
        }
    }
}
