use std::env;

use derive_getters::Getters;
use url::Url;

use crate::error::ClientError;

/// Environment variable naming the GraphQL endpoint.
pub const GRAPHQL_URI_VAR: &str = "GRAPHQL_URI";

/// Endpoint used when [`GRAPHQL_URI_VAR`] is unset.
pub const DEFAULT_GRAPHQL_URI: &str = "https://graphqlzero.almansi.me/api";

/// Runtime configuration read once at startup and handed to the plugin.
#[derive(Clone, Debug, Getters)]
pub struct RuntimeConfig {
    /// The GraphQL endpoint for this process.
    graphql_uri: Url,
}

impl RuntimeConfig {
    /// Reads the runtime configuration from the process environment.
    pub fn from_env() -> Result<RuntimeConfig, ClientError> {
        let raw = env::var(GRAPHQL_URI_VAR).unwrap_or_else(|_| DEFAULT_GRAPHQL_URI.to_string());
        let graphql_uri = Url::parse(&raw).map_err(|err| ClientError::Config {
            msg: format!("invalid {GRAPHQL_URI_VAR} `{raw}`: {err}"),
        })?;
        Ok(RuntimeConfig { graphql_uri })
    }
}
