use wot_core::{CoreError, Identifier};

/// Errors raised while searching for or assembling trust paths.
///
/// These are invariant violations; an unauthenticated binding is reported
/// as an empty result, never as an error.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("appending an edge into {identifier} would create a cycle")]
    CyclicPath { identifier: Identifier },

    #[error("edge issued by {issuer} does not continue a path ending at {tail}")]
    NotChained { tail: Identifier, issuer: Identifier },

    #[error("amount {amount} exceeds the path capacity {capacity}")]
    AmountExceedsCapacity { amount: u8, capacity: u8 },

    #[error(
        "suppressing {amount} on {issuer} -> {target} exceeds its capacity {capacity} \
         ({suppressed} already suppressed)"
    )]
    SuppressionOverflow {
        issuer: Identifier,
        target: Identifier,
        amount: u8,
        suppressed: u32,
        capacity: u8,
    },

    #[error("no forward pointer recorded for {identifier}")]
    BrokenChain { identifier: Identifier },

    #[error(transparent)]
    Core(#[from] CoreError),
}
