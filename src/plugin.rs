use derive_getters::Getters;
use url::Url;

use crate::{
    client::{load_client, ClientConfig, GraphQlClient},
    config::RuntimeConfig,
    error::ClientError,
};

/// Bundles the client handle and its endpoint for consuming code, the way an
/// application plugin provides them through dependency injection.
#[derive(Clone, Getters)]
pub struct GraphQlPlugin {
    /// The process-wide client handle.
    client: GraphQlClient,
    /// The endpoint the client is bound to.
    graphql_uri: Url,
}

impl GraphQlPlugin {
    /// Builds the plugin from a runtime configuration, loading the
    /// process-wide client.
    pub fn new(config: &RuntimeConfig) -> GraphQlPlugin {
        let client_config = ClientConfig::builder()
            .endpoint(config.graphql_uri().clone())
            .build();
        GraphQlPlugin {
            client: load_client(&client_config),
            graphql_uri: config.graphql_uri().clone(),
        }
    }

    /// Builds the plugin from the process environment.
    pub fn from_env() -> Result<GraphQlPlugin, ClientError> {
        Ok(GraphQlPlugin::new(&RuntimeConfig::from_env()?))
    }
}
