#![warn(missing_docs)]

//! Provides [`tower`] implementations for HTTP requests

use std::pin::Pin;

use futures::Future;

/// Install ring as the default rustls crypto provider. This runs automatically
/// as a global constructor in every binary that links quiver-http (directly or
/// transitively).
#[ctor::ctor]
fn install_ring_crypto_provider() {
    // .ok() because the provider may already be installed, and that's the only
    // case that causes this to error
    rustls::crypto::ring::default_provider()
        .install_default()
        .ok();
}

use bytes::Bytes;
pub use http_body::Body;
pub use http_body_util::{BodyExt, Empty, Full};
use tower::util::BoxCloneService;

pub mod body;
mod error;
pub mod extend_headers;
mod reqwest;
pub mod timeout;

pub use error::HttpServiceError;
pub use reqwest::ReqwestService;

/// Ease-of-use synonym for the request type this crate operates on
pub type HttpRequest = http::Request<Full<Bytes>>;
/// Ease-of-use synonym for the response type this crate operates on.
/// Response bodies are fully buffered before they are handed to callers.
pub type HttpResponse = http::Response<Bytes>;
/// Ease-of-use synonym for the [`Service`](tower::Service) type this crate provides
pub type HttpService = BoxCloneService<HttpRequest, HttpResponse, HttpServiceError>;

/// Boxed future returned by the [`tower::Service`] implementations in this crate
pub type ResponseFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
