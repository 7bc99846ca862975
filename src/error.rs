/// Errors surfaced by the conversation core.
///
/// Decode-level anomalies (bad frames, unknown events, malformed payloads)
/// are absorbed before this boundary; only transport failures and rejected
/// turn requests reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A turn request arrived while another turn was still draining.
    #[error("turn already in progress")]
    TurnInProgress,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Failure reported by a non-HTTP transport implementation.
    #[error("transport error: {0}")]
    Transport(String),
}
