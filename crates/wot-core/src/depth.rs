use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Raw value that marks an unconstrained trust depth.
const UNCONSTRAINED: u8 = 255;

/// How many further delegation hops an introducer may extend.
///
/// Depths `0..=254` are limited; `255` is unconstrained. The derived
/// ordering places unconstrained above every limited depth, so
/// [`Ord::min`] treats it as the identity element.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TrustDepth(u8);

impl TrustDepth {
    /// A limited depth. Fails for `255`, which is reserved for
    /// [`TrustDepth::unconstrained`].
    pub fn limited(depth: u8) -> Result<Self, CoreError> {
        if depth == UNCONSTRAINED {
            return Err(CoreError::InvalidTrustDepth(depth));
        }
        Ok(Self(depth))
    }

    /// An unconstrained depth.
    pub const fn unconstrained() -> Self {
        Self(UNCONSTRAINED)
    }

    /// Interpret a wire value: `255` is unconstrained, anything else limited.
    pub const fn auto(depth: u8) -> Self {
        Self(depth)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.0 == UNCONSTRAINED
    }

    /// The raw depth value (`255` when unconstrained).
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Consume `by` hops of depth.
    pub fn reduce(self, by: u8) -> Result<Self, CoreError> {
        if self.is_unconstrained() {
            return Ok(self);
        }
        self.0
            .checked_sub(by)
            .map(Self)
            .ok_or(CoreError::DepthExhausted { depth: self.0, by })
    }

    /// Whether this depth allows at least `hops` further hops.
    pub fn covers(&self, hops: usize) -> bool {
        self.is_unconstrained() || usize::from(self.0) >= hops
    }
}

impl fmt::Display for TrustDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unconstrained() {
            f.write_str("unconstrained")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
