//! Composes the transport chain backing a client: an optional
//! persisted-query stage ahead of the HTTP transport, with the whole chain
//! capped by the request timeout.

use std::sync::OnceLock;
use std::time::Duration;

use quiver_graphql::persisted::PersistedQueryLayer;
use quiver_http::{timeout::TimeoutLayer, HttpService, ReqwestService};
use tower::{ServiceBuilder, ServiceExt};

use crate::{context::ExecutionMode, options::RequestOptions};

/// Ceiling applied to every operation. An operation that has not completed
/// within this duration fails with a timeout error; partial results are
/// never surfaced.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// One connection pool backs every client constructed in this process.
fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::default)
}

/// Composes the transport chain for one client per the given options and
/// execution mode.
pub fn compose_link(options: &RequestOptions, mode: ExecutionMode) -> HttpService {
    compose_link_with_timeout(options, mode, DEFAULT_REQUEST_TIMEOUT)
}

pub(crate) fn compose_link_with_timeout(
    options: &RequestOptions,
    mode: ExecutionMode,
    timeout: Duration,
) -> HttpService {
    let http = ReqwestService::new(shared_http_client().clone());
    // persisted queries require the APQ negotiation with the server, which
    // is skipped in the long-lived server context
    if *options.automatic_persisted_queries() && !mode.is_long_lived_server() {
        tracing::debug!(
            get_for_hashed_queries = *options.get_automatic_persisted_queries(),
            "composing transport chain with a persisted-query stage"
        );
        ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(PersistedQueryLayer::new(
                *options.get_automatic_persisted_queries(),
            ))
            .service(http)
            .boxed_clone()
    } else {
        ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .service(http)
            .boxed_clone()
    }
}
