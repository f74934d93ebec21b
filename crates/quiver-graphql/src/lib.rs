#![warn(missing_docs)]

//! Provides GraphQL middleware for HTTP services

use std::{fmt, future::Future, pin::Pin, str::FromStr};

use bytes::Bytes;
use graphql_client::GraphQLQuery;
use http::{uri::InvalidUri, HeaderValue, Method, StatusCode, Uri};
use http_body_util::Full;
use quiver_http::{HttpRequest, HttpResponse};
use tower::{Layer, Service};
use url::Url;

pub mod persisted;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Re-export / renamed type alias for [`graphql_client::Response`]
pub type GraphQLResponse<T> = graphql_client::Response<T>;

/// Whether an operation is a query or a mutation. Assigned when the
/// operation is prepared, so no shape inspection happens at dispatch time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
    /// A read-only operation
    Query,
    /// An operation that creates, updates or deletes data
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            OperationKind::Query => write!(f, "Query"),
            OperationKind::Mutation => write!(f, "Mutation"),
        }
    }
}

/// Diagnostic context captured when an operation is serialized, carried on
/// the error variants so callers can log what failed without re-deriving it
#[derive(Clone, Debug)]
pub struct OperationDetails {
    /// Whether the failed operation was a query or a mutation
    pub kind: OperationKind,
    /// The operation name from the GraphQL document
    pub operation_name: String,
    /// The operation's variables, as JSON
    pub variables: serde_json::Value,
}

/// Errors that may occur from using a [`GraphQLService`]
#[derive(thiserror::Error, Debug)]
pub enum GraphQLServiceError<T: Send + Sync + fmt::Debug> {
    /// There was no data field provided in the response
    #[error("{} {} returned no data", .details.kind, .details.operation_name)]
    NoData {
        /// The GraphQL errors that were produced
        errors: Vec<graphql_client::Error>,
        /// Diagnostic context for the failed operation
        details: OperationDetails,
    },
    /// The response returned some data, but there were errors
    #[error("{} {} returned data, but with {} error(s)", .details.kind, .details.operation_name, .errors.len())]
    PartialError {
        /// The partial data returned
        data: T,
        /// The GraphQL errors that were produced
        errors: Vec<graphql_client::Error>,
        /// Diagnostic context for the failed operation
        details: OperationDetails,
    },
    /// Data serialization error
    #[error("Serialization error")]
    Serialization(#[source] serde_json::Error),
    /// Data deserialization error
    #[error("Deserialization error")]
    Deserialization {
        /// The source error
        error: serde_json::Error,
        /// The data that was attempted to be deserialized
        data: Bytes,
        /// The [`StatusCode`] of the request
        status_code: StatusCode,
    },
    /// [`http`]-related error, probably from header-related tasks
    #[error("HTTP error: {:?}", .0)]
    Http(#[from] http::Error),
    /// Error that occurs from a failure to parse a [`Uri`] from a [`Url`]
    #[error("Unable to convert URL to URI.")]
    InvalidUri(#[from] InvalidUri),
    /// Errors that occur as a result of the underlying HTTP service failing
    #[error("Upstream service error: {:?}", .0)]
    UpstreamService(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl<T: Send + Sync + fmt::Debug> GraphQLServiceError<T> {
    /// The GraphQL-level errors carried by this error, if any, along with the
    /// diagnostic context of the operation that produced them
    pub fn graphql_errors(&self) -> Option<(&[graphql_client::Error], &OperationDetails)> {
        match self {
            GraphQLServiceError::NoData { errors, details } => Some((errors, details)),
            GraphQLServiceError::PartialError {
                errors, details, ..
            } => Some((errors, details)),
            _ => None,
        }
    }
}

/// A prepared GraphQL operation: a tagged kind plus the typed variables of a
/// [`GraphQLQuery`]. The document itself is part of `Q` and is serialized by
/// the [`GraphQLService`] when the operation is dispatched.
pub struct GraphQLRequest<Q: GraphQLQuery> {
    kind: OperationKind,
    variables: Q::Variables,
}

impl<Q> fmt::Debug for GraphQLRequest<Q>
where
    Q: GraphQLQuery,
    Q::Variables: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} {:?}", self.kind, self.variables)
    }
}

impl<Q> PartialEq for GraphQLRequest<Q>
where
    Q: GraphQLQuery,
    Q::Variables: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.variables == other.variables
    }
}

impl<Q: GraphQLQuery> GraphQLRequest<Q> {
    /// Constructs a [`GraphQLRequest`] tagged as a query
    pub fn query(variables: Q::Variables) -> GraphQLRequest<Q> {
        GraphQLRequest {
            kind: OperationKind::Query,
            variables,
        }
    }
    /// Constructs a [`GraphQLRequest`] tagged as a mutation
    pub fn mutation(variables: Q::Variables) -> GraphQLRequest<Q> {
        GraphQLRequest {
            kind: OperationKind::Mutation,
            variables,
        }
    }
    /// The tagged kind of this operation
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
    /// Consumes the [`GraphQLRequest`] and produces its kind and variables
    pub fn into_parts(self) -> (OperationKind, Q::Variables) {
        (self.kind, self.variables)
    }
}

/// [`Layer`] that wraps a service with GraphQL middleware
pub struct GraphQLLayer {
    endpoint: Url,
}

impl GraphQLLayer {
    /// Constructs a new [`GraphQLLayer`] bound to an endpoint
    pub fn new(endpoint: Url) -> GraphQLLayer {
        GraphQLLayer { endpoint }
    }
}

impl<S> Layer<S> for GraphQLLayer {
    type Service = GraphQLService<S>;
    fn layer(&self, inner: S) -> Self::Service {
        GraphQLService::new(self.endpoint.clone(), inner)
    }
}

/// Middleware that wraps an HTTP service in GraphQL functionality: it
/// serializes the operation into a `{query, variables, operationName}` body,
/// POSTs it to the endpoint, and classifies the `{data, errors}` envelope of
/// the response
#[derive(Clone, Debug)]
pub struct GraphQLService<S> {
    inner: S,
    endpoint: Url,
}

impl<S> GraphQLService<S> {
    /// Constructs a new [`GraphQLService`]
    pub fn new(endpoint: Url, inner: S) -> GraphQLService<S> {
        GraphQLService { endpoint, inner }
    }
}

impl<Q, S> Service<GraphQLRequest<Q>> for GraphQLService<S>
where
    Q: GraphQLQuery + Send + Sync + 'static,
    Q::Variables: Send,
    Q::ResponseData: Send + Sync + fmt::Debug,
    S: Service<HttpRequest, Response = HttpResponse> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    type Response = Q::ResponseData;
    type Error = GraphQLServiceError<Q::ResponseData>;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        tower::Service::poll_ready(&mut self.inner, cx)
            .map_err(|err| GraphQLServiceError::UpstreamService(Box::new(err)))
    }

    fn call(&mut self, req: GraphQLRequest<Q>) -> Self::Future {
        // https://docs.rs/tower/latest/tower/trait.Service.html#be-careful-when-cloning-inner-services
        let cloned = self.inner.clone();
        let mut client = std::mem::replace(&mut self.inner, cloned);

        let url = self.endpoint.clone();

        let fut = async move {
            let (kind, variables) = req.into_parts();
            let body = Q::build_query(variables);
            let details = OperationDetails {
                kind,
                operation_name: body.operation_name.to_string(),
                variables: serde_json::to_value(&body.variables)
                    .map_err(GraphQLServiceError::Serialization)?,
            };
            let body_bytes =
                Bytes::from(serde_json::to_vec(&body).map_err(GraphQLServiceError::Serialization)?);
            let req = http::Request::builder()
                .uri(Uri::from_str(url.as_ref())?)
                .method(Method::POST)
                .header(
                    http::header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_CONTENT_TYPE),
                )
                .body(Full::new(body_bytes))
                .map_err(GraphQLServiceError::Http)?;
            let resp = client
                .call(req)
                .await
                .map_err(|err| GraphQLServiceError::UpstreamService(Box::new(err)))?;
            let body = resp.body();
            let graphql_response: graphql_client::Response<Q::ResponseData> =
                serde_json::from_slice(body).map_err(|err| {
                    GraphQLServiceError::Deserialization {
                        error: err,
                        data: body.clone(),
                        status_code: resp.status(),
                    }
                })?;

            match graphql_response.errors {
                // an empty errors list counts as success, only a populated one
                // takes the error path
                Some(errors) if !errors.is_empty() => match graphql_response.data {
                    Some(data) => Err(GraphQLServiceError::PartialError {
                        data,
                        errors,
                        details,
                    }),
                    None => Err(GraphQLServiceError::NoData { errors, details }),
                },
                _ => match graphql_response.data {
                    Some(data) => Ok(data),
                    None => Err(GraphQLServiceError::NoData {
                        errors: Vec::default(),
                        details,
                    }),
                },
            }
        };
        Box::pin(fut)
    }
}
