use wot_core::CoreError;

/// Errors that abort building a network from certificate records.
///
/// Individual signatures failing verification are not errors; they are
/// logged and left out of the network.
#[derive(Debug, thiserror::Error)]
pub enum CertsError {
    #[error("malformed certificate records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network construction failed: {0}")]
    Network(#[from] CoreError),
}
