/// Errors produced by the HTTP services in this crate
#[derive(thiserror::Error, Debug)]
pub enum HttpServiceError {
    /// [`http`]-related error, probably from request construction
    #[error("HTTP Error: {:?}", .0)]
    Http(#[from] http::Error),
    /// The request did not complete within its allotted time
    #[error("Request timed out")]
    TimedOut,
    /// A connection to the remote host could not be established
    #[error("Connect error: {:?}", .0)]
    Connect(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// A request or response body could not be read
    #[error("Body error: {:?}", .0)]
    Body(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// A response payload could not be decoded
    #[error("Decode error: {:?}", .0)]
    Decode(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// Catch-all for failures that do not fit the other variants
    #[error("Unexpected HTTP error: {:?}", .0)]
    Unexpected(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl HttpServiceError {
    /// Whether the error was a failure to connect to the remote host
    pub fn is_connect(&self) -> bool {
        matches!(self, HttpServiceError::Connect(_))
    }
    /// Whether the error was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpServiceError::TimedOut)
    }
    /// Whether the error was a decode failure
    pub fn is_decode(&self) -> bool {
        matches!(self, HttpServiceError::Decode(_))
    }
}
