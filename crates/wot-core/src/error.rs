use crate::identifier::Identifier;

/// Errors raised while building or manipulating the trust network.
///
/// All variants describe broken invariants in the caller's graph
/// construction; none of them is a normal "not trusted" outcome.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("trust depth {0} is not a limited depth (expected 0..=254)")]
    InvalidTrustDepth(u8),

    #[error("trust depth {depth} cannot be reduced by {by}")]
    DepthExhausted { depth: u8, by: u8 },

    #[error("component {issuer} -> {target} does not belong to edge {edge_issuer} -> {edge_target}")]
    ComponentMismatch {
        issuer: Identifier,
        target: Identifier,
        edge_issuer: Identifier,
        edge_target: Identifier,
    },
}
