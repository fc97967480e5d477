use thiserror::Error;

/// Errors from the Animeloop API client.
///
/// Callers should handle the variants distinctly; `NoResults` in particular
/// means a well-formed query matched nothing, not a hard failure.
#[derive(Debug, Error)]
pub enum AnimeloopError {
    /// The response could not be fetched or decoded as JSON. The underlying
    /// transport error is available via `source()` only.
    #[error("cannot fetch JSON data")]
    Connection(#[from] reqwest::Error),

    /// The API reported a failure envelope. Carries the server `message`
    /// verbatim when present, otherwise `Error {code}`.
    #[error("{0}")]
    Api(String),

    /// The query was valid but matched nothing.
    #[error("no results found")]
    NoResults,

    /// A timestamp field did not match any accepted format.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// A success envelope's `data` did not match the expected payload shape.
    #[error("unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),
}
