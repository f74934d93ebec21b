//! A thin, typed GraphQL client: endpoint configuration, automatic persisted
//! queries, a fixed request timeout and a query/mutate surface with a
//! configurable error policy.
//!
//! The transport is a [`tower`] chain composed per client: an optional
//! persisted-query stage ahead of the HTTP transport, the whole chain capped
//! by a 10 second timeout. See [`link`] for the chain construction and
//! [`GraphQlClient::execute`] for dispatch semantics.

mod client;
mod config;
mod context;
mod error;

/// Module for composing the transport chain backing a client.
pub mod link;

mod operation;

/// Sample operations against the GraphQLZero demo API.
pub mod operations;

mod options;
mod plugin;

pub use client::{
    load_client, reset_global_client, ClientConfig, ErrorPolicy, GraphQlClient, ReusePolicy,
};
pub use config::{RuntimeConfig, DEFAULT_GRAPHQL_URI, GRAPHQL_URI_VAR};
pub use context::ExecutionMode;
pub use error::ClientError;
pub use operation::Operation;
pub use options::RequestOptions;
pub use plugin::GraphQlPlugin;
pub use quiver_graphql::OperationKind;
