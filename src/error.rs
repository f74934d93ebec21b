use quiver_graphql::OperationKind;
use thiserror::Error;

/// ClientError represents all possible failures that can occur during a
/// client request.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The response carried GraphQL errors and the client is configured to
    /// raise after logging them.
    #[error("{kind} {operation_name} failed")]
    GraphQl {
        /// Whether the failed operation was a query or a mutation.
        kind: OperationKind,
        /// The operation name from the GraphQL document.
        operation_name: String,
    },
    /// The runtime configuration could not be read.
    #[error("invalid configuration: {msg}")]
    Config {
        /// The error message.
        msg: String,
    },
    /// Encountered an error sending the request: timeout, connect failure,
    /// or an unreadable response.
    #[error("encountered an error while sending a request")]
    SendRequest(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ClientError {
    /// Whether the error was raised by the configured GraphQL error policy.
    pub fn is_graphql(&self) -> bool {
        matches!(self, ClientError::GraphQl { .. })
    }
}
