//! Injects a fixed set of headers into every request passing through the
//! service, e.g. per-operation headers attached at request preparation time.

use http::HeaderMap;
use tower::{Layer, Service};

/// [`tower::Layer`] that adds a fixed [`HeaderMap`] to every request
pub struct ExtendHeadersLayer {
    headers: HeaderMap,
}

impl ExtendHeadersLayer {
    /// Constructs a new [`ExtendHeadersLayer`]
    pub fn new(headers: impl Into<HeaderMap>) -> ExtendHeadersLayer {
        ExtendHeadersLayer {
            headers: headers.into(),
        }
    }
}

impl<S: Clone> Layer<S> for ExtendHeadersLayer {
    type Service = ExtendHeaders<S>;
    fn layer(&self, inner: S) -> Self::Service {
        ExtendHeaders {
            headers: self.headers.clone(),
            inner,
        }
    }
}

/// Middleware that extends request headers with a fixed [`HeaderMap`].
/// Existing header names are appended to, not replaced.
#[derive(Clone)]
pub struct ExtendHeaders<S: Clone> {
    headers: HeaderMap,
    inner: S,
}

impl<S: Clone> ExtendHeaders<S> {
    /// Constructs a new [`ExtendHeaders`] around an inner service
    pub fn new(headers: HeaderMap, inner: S) -> ExtendHeaders<S> {
        ExtendHeaders { headers, inner }
    }
}

impl<Req, S> Service<http::Request<Req>> for ExtendHeaders<S>
where
    S: Service<http::Request<Req>> + Clone,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<Req>) -> Self::Future {
        req.headers_mut().extend(self.headers.clone());
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{HeaderMap, HeaderValue};
    use speculoos::prelude::*;
    use tower::{service_fn, Service, ServiceExt};

    use crate::{HttpRequest, HttpResponse, HttpServiceError};

    use super::ExtendHeadersLayer;
    use tower::Layer;

    #[tokio::test]
    pub async fn headers_are_attached_to_the_request() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("secret"));

        let inner = service_fn(|req: HttpRequest| async move {
            assert_that!(req.headers().get("x-api-key"))
                .is_some()
                .is_equal_to(&HeaderValue::from_static("secret"));
            Ok::<HttpResponse, HttpServiceError>(http::Response::new(Bytes::new()))
        });

        let mut service = ExtendHeadersLayer::new(headers).layer(inner);
        let request = http::Request::builder()
            .uri("http://example.com/graphql")
            .body(crate::Full::new(Bytes::new()))
            .unwrap();
        let result = service.ready().await.unwrap().call(request).await;
        assert_that!(result).is_ok();
    }
}
