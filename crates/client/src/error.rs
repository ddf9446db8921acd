use areal_types::bbox::BboxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The viewport rectangle is not usable as a query window
    #[error("invalid window: {0}")]
    Window(#[from] BboxError),

    /// The transport failed before a response arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("server error: {0}")]
    Server(String),

    /// The response body is not a FeatureCollection
    #[error("malformed response: {0}")]
    Decode(String),

    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
