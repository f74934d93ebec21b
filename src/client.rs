use std::fmt;
use std::sync::{Mutex, PoisonError};

use buildstructor::buildstructor;
use derive_getters::Getters;
use graphql_client::GraphQLQuery;
use quiver_graphql::{GraphQLLayer, GraphQLRequest, GraphQLServiceError, OperationDetails};
use quiver_http::{extend_headers::ExtendHeadersLayer, HttpService};
use tower::{Service, ServiceBuilder, ServiceExt};
use url::Url;

use crate::{
    context::ExecutionMode, error::ClientError, link::compose_link, operation::Operation,
    options::RequestOptions,
};

/// What to do when a well-formed response carries GraphQL errors.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Log every error, then return no data.
    #[default]
    SwallowAndLog,
    /// Log every error, then fail the call.
    LogAndRaise,
}

/// How repeat [`load_client`] calls are served.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReusePolicy {
    /// The first constructed client is retained for the life of the process;
    /// later calls reuse it and silently ignore differing endpoints.
    #[default]
    SingletonPerProcess,
    /// Every call composes a fresh client and transport chain.
    FreshPerCall,
}

/// Everything needed to construct (or look up) a client.
#[derive(Clone, Debug, Getters)]
pub struct ClientConfig {
    /// The GraphQL endpoint requests are sent to.
    endpoint: Url,
    /// Per-client request options.
    options: RequestOptions,
    /// The execution context the client runs in.
    mode: ExecutionMode,
    /// What to do when a response carries GraphQL errors.
    error_policy: ErrorPolicy,
    /// How repeat [`load_client`] calls are served.
    reuse_policy: ReusePolicy,
}

#[buildstructor]
impl ClientConfig {
    /// Constructs a new [`ClientConfig`]; everything except the endpoint
    /// has a default.
    #[builder]
    pub fn new(
        endpoint: Url,
        options: Option<RequestOptions>,
        mode: Option<ExecutionMode>,
        error_policy: Option<ErrorPolicy>,
        reuse_policy: Option<ReusePolicy>,
    ) -> ClientConfig {
        ClientConfig {
            endpoint,
            options: options.unwrap_or_default(),
            mode: mode.unwrap_or_default(),
            error_policy: error_policy.unwrap_or_default(),
            reuse_policy: reuse_policy.unwrap_or_default(),
        }
    }
}

/// A configured GraphQL client: an endpoint bound to a composed transport
/// chain and an error policy. Cheap to clone; clones share the chain.
#[derive(Clone)]
pub struct GraphQlClient {
    endpoint: Url,
    chain: HttpService,
    error_policy: ErrorPolicy,
}

static GLOBAL_CLIENT: Mutex<Option<GraphQlClient>> = Mutex::new(None);

/// Obtains a client per the config's [`ReusePolicy`]. Under
/// [`ReusePolicy::SingletonPerProcess`] the slot is guarded by a lock, so a
/// second caller arriving during construction waits for and reuses the
/// in-flight client instead of racing it.
pub fn load_client(config: &ClientConfig) -> GraphQlClient {
    match config.reuse_policy() {
        ReusePolicy::FreshPerCall => GraphQlClient::new(config),
        ReusePolicy::SingletonPerProcess => {
            let mut slot = GLOBAL_CLIENT.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(client) => client.clone(),
                None => {
                    tracing::debug!(endpoint = %config.endpoint(), "constructing process-wide client");
                    let client = GraphQlClient::new(config);
                    *slot = Some(client.clone());
                    client
                }
            }
        }
    }
}

/// Clears the process-wide singleton slot so the next [`load_client`] call
/// constructs a fresh client. There is no teardown beyond this; the slot
/// otherwise lives until process exit.
pub fn reset_global_client() {
    let mut slot = GLOBAL_CLIENT.lock().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}

impl GraphQlClient {
    /// Constructs a fresh client, composing a new transport chain from the
    /// config's options and execution mode.
    pub fn new(config: &ClientConfig) -> GraphQlClient {
        GraphQlClient {
            endpoint: config.endpoint().clone(),
            chain: compose_link(config.options(), *config.mode()),
            error_policy: *config.error_policy(),
        }
    }

    /// The endpoint this client is bound to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Executes a prepared operation through the transport chain.
    ///
    /// A response with a non-empty `errors` list is logged, one line per
    /// error, and then either swallowed (`Ok(None)`) or raised
    /// (`Err(ClientError::GraphQl)`) per the configured [`ErrorPolicy`].
    /// Transport failures always propagate as `Err`, regardless of policy.
    pub async fn execute<Q>(
        &self,
        operation: Operation<Q>,
    ) -> Result<Option<Q::ResponseData>, ClientError>
    where
        Q: GraphQLQuery + Send + Sync + 'static,
        Q::Variables: Send,
        Q::ResponseData: Send + Sync + fmt::Debug + 'static,
    {
        let (request, headers) = operation.into_parts();
        let mut service = ServiceBuilder::new()
            .layer(GraphQLLayer::new(self.endpoint.clone()))
            .layer(ExtendHeadersLayer::new(headers))
            .service(self.chain.clone());

        let result = async {
            let service = ServiceExt::<GraphQLRequest<Q>>::ready(&mut service).await?;
            service.call(request).await
        }
        .await;

        match result {
            Ok(data) => Ok(Some(data)),
            Err(err) => self.handle_failure(err),
        }
    }

    fn handle_failure<T>(&self, err: GraphQLServiceError<T>) -> Result<Option<T>, ClientError>
    where
        T: Send + Sync + fmt::Debug + 'static,
    {
        match err {
            // an absent data field with no errors mirrors the empty payload
            // of the upstream response
            GraphQLServiceError::NoData { errors, .. } if errors.is_empty() => Ok(None),
            GraphQLServiceError::NoData { errors, details } => {
                self.apply_error_policy(&errors, details)
            }
            // partial data is discarded once the errors are logged
            GraphQLServiceError::PartialError {
                errors, details, ..
            } => self.apply_error_policy(&errors, details),
            other => {
                tracing::error!(error = ?other, "transport failure during GraphQL request");
                Err(ClientError::SendRequest(Box::new(other)))
            }
        }
    }

    fn apply_error_policy<T>(
        &self,
        errors: &[graphql_client::Error],
        details: OperationDetails,
    ) -> Result<Option<T>, ClientError> {
        for (index, error) in errors.iter().enumerate() {
            tracing::error!(
                kind = %details.kind,
                operation = %details.operation_name,
                index,
                variables = %details.variables,
                "GraphQL error: {}",
                error.message,
            );
        }
        match self.error_policy {
            ErrorPolicy::SwallowAndLog => Ok(None),
            ErrorPolicy::LogAndRaise => Err(ClientError::GraphQl {
                kind: details.kind,
                operation_name: details.operation_name,
            }),
        }
    }
}
