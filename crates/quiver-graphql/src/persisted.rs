//! Automatic persisted queries (APQ).
//!
//! The first attempt for an operation replaces the query text with a sha-256
//! digest carried in the `persistedQuery` extension. Servers that already
//! know the digest answer directly; servers that do not reply with a
//! `PersistedQueryNotFound` error, in which case the full text is resent.
//! Hashed attempts can optionally be sent as GET requests so they are
//! cacheable by intermediaries.

use std::str::FromStr;

use bytes::Bytes;
use http::{request::Parts, Method, Uri};
use http_body_util::Full;
use quiver_http::{body::body_to_bytes, HttpRequest, HttpResponse, HttpServiceError, ResponseFuture};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tower::{Layer, Service, ServiceExt};
use url::Url;

/// Version field of the `persistedQuery` extension envelope
pub const PERSISTED_QUERY_VERSION: i32 = 1;

const PERSISTED_QUERY_NOT_FOUND: &str = "PersistedQueryNotFound";
const PERSISTED_QUERY_NOT_SUPPORTED: &str = "PersistedQueryNotSupported";
const PERSISTED_QUERY_NOT_FOUND_CODE: &str = "PERSISTED_QUERY_NOT_FOUND";
const PERSISTED_QUERY_NOT_SUPPORTED_CODE: &str = "PERSISTED_QUERY_NOT_SUPPORTED";

/// [`Layer`] that wraps an HTTP service with the persisted-query stage
pub struct PersistedQueryLayer {
    use_get_for_hashed_queries: bool,
}

impl PersistedQueryLayer {
    /// Constructs a new [`PersistedQueryLayer`]. When
    /// `use_get_for_hashed_queries` is set, hashed attempts are sent as GET
    /// requests; the full-text fallback is always a POST.
    pub const fn new(use_get_for_hashed_queries: bool) -> PersistedQueryLayer {
        PersistedQueryLayer {
            use_get_for_hashed_queries,
        }
    }
}

impl<S> Layer<S> for PersistedQueryLayer {
    type Service = PersistedQueryService<S>;
    fn layer(&self, inner: S) -> Self::Service {
        PersistedQueryService {
            inner,
            use_get_for_hashed_queries: self.use_get_for_hashed_queries,
        }
    }
}

/// Middleware implementing the automatic-persisted-query negotiation ahead of
/// the HTTP transport
#[derive(Clone, Debug)]
pub struct PersistedQueryService<S> {
    inner: S,
    use_get_for_hashed_queries: bool,
}

impl<S> Service<HttpRequest> for PersistedQueryService<S>
where
    S: Service<HttpRequest, Response = HttpResponse, Error = HttpServiceError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = HttpResponse;
    type Error = HttpServiceError;
    type Future = ResponseFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: HttpRequest) -> Self::Future {
        // https://docs.rs/tower/latest/tower/trait.Service.html#be-careful-when-cloning-inner-services
        let cloned = self.inner.clone();
        let mut client = std::mem::replace(&mut self.inner, cloned);
        let use_get = self.use_get_for_hashed_queries;

        let fut = async move {
            let mut req = req;
            let body_bytes = body_to_bytes(req.body_mut())
                .await
                .map_err(|err| HttpServiceError::Body(Box::new(err)))?;
            let (parts, _) = req.into_parts();

            // requests without a hashable query pass through unmodified
            let envelope: Value = match serde_json::from_slice(&body_bytes) {
                Ok(envelope) => envelope,
                Err(_) => {
                    let req = http::Request::from_parts(parts, Full::new(body_bytes));
                    return client.ready().await?.call(req).await;
                }
            };
            let Some(query) = envelope.get("query").and_then(Value::as_str) else {
                let req = http::Request::from_parts(parts, Full::new(body_bytes));
                return client.ready().await?.call(req).await;
            };

            let digest = hex::encode(Sha256::digest(query.as_bytes()));
            let extensions = serde_json::json!({
                "persistedQuery": {
                    "version": PERSISTED_QUERY_VERSION,
                    "sha256Hash": digest,
                }
            });

            let mut hashed = envelope.clone();
            if let Some(map) = hashed.as_object_mut() {
                map.remove("query");
                map.insert("extensions".to_string(), extensions.clone());
            }

            let first = if use_get {
                hashed_get_request(parts.clone(), &hashed)?
            } else {
                json_request(parts.clone(), &hashed)?
            };
            let resp = client.ready().await?.call(first).await?;
            if !is_persisted_query_miss(resp.body()) {
                return Ok(resp);
            }

            // the server does not know this digest yet, resend the full text
            let mut full = envelope;
            if let Some(map) = full.as_object_mut() {
                map.insert("extensions".to_string(), extensions);
            }
            let retry = json_request(parts, &full)?;
            client.ready().await?.call(retry).await
        };
        Box::pin(fut)
    }
}

fn json_request(parts: Parts, body: &Value) -> Result<HttpRequest, HttpServiceError> {
    let bytes = Bytes::from(
        serde_json::to_vec(body).map_err(|err| HttpServiceError::Unexpected(Box::new(err)))?,
    );
    Ok(http::Request::from_parts(parts, Full::new(bytes)))
}

fn hashed_get_request(mut parts: Parts, envelope: &Value) -> Result<HttpRequest, HttpServiceError> {
    let mut url = Url::parse(&parts.uri.to_string())
        .map_err(|err| HttpServiceError::Unexpected(Box::new(err)))?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(name) = envelope.get("operationName").and_then(Value::as_str) {
            pairs.append_pair("operationName", name);
        }
        if let Some(variables) = envelope.get("variables") {
            if !variables.is_null() {
                pairs.append_pair("variables", &variables.to_string());
            }
        }
        if let Some(extensions) = envelope.get("extensions") {
            pairs.append_pair("extensions", &extensions.to_string());
        }
    }
    parts.method = Method::GET;
    parts.uri =
        Uri::from_str(url.as_str()).map_err(|err| HttpServiceError::Unexpected(Box::new(err)))?;
    Ok(http::Request::from_parts(parts, Full::new(Bytes::new())))
}

fn is_persisted_query_miss(body: &Bytes) -> bool {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return false;
    };
    let Some(errors) = value.get("errors").and_then(Value::as_array) else {
        return false;
    };
    errors.iter().any(|error| {
        let message = error.get("message").and_then(Value::as_str);
        let code = error
            .get("extensions")
            .and_then(|extensions| extensions.get("code"))
            .and_then(Value::as_str);
        matches!(
            message,
            Some(PERSISTED_QUERY_NOT_FOUND | PERSISTED_QUERY_NOT_SUPPORTED)
        ) || matches!(
            code,
            Some(PERSISTED_QUERY_NOT_FOUND_CODE | PERSISTED_QUERY_NOT_SUPPORTED_CODE)
        )
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::Method;
    use quiver_http::{body::body_to_bytes, HttpRequest, HttpResponse, HttpServiceError};
    use serde_json::{json, Value};
    use sha2::{Digest, Sha256};
    use speculoos::prelude::*;
    use tokio::task;
    use tower::{Service, ServiceBuilder, ServiceExt};
    use tower_test::mock;

    use super::PersistedQueryLayer;

    const QUERY: &str = "query FetchWidget { __typename }";

    fn graphql_request(body: Value) -> HttpRequest {
        http::Request::builder()
            .uri("http://example.com/graphql")
            .method(Method::POST)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(quiver_http::Full::new(Bytes::from(
                serde_json::to_vec(&body).unwrap(),
            )))
            .unwrap()
    }

    fn expected_extensions() -> Value {
        json!({
            "persistedQuery": {
                "version": 1,
                "sha256Hash": hex::encode(Sha256::digest(QUERY.as_bytes())),
            }
        })
    }

    #[tokio::test]
    pub async fn test_hashed_attempt_replaces_query_text() {
        let (mock_service, mut handle) = mock::spawn::<HttpRequest, HttpResponse>();
        let mut service = ServiceBuilder::new()
            .layer(PersistedQueryLayer::new(false))
            .map_err(HttpServiceError::Unexpected)
            .service(mock_service.into_inner());
        let service = ServiceExt::<HttpRequest>::ready(&mut service).await.unwrap();

        let request = graphql_request(json!({
            "query": QUERY,
            "variables": {"variable": 7},
            "operationName": "FetchWidget",
        }));
        let service_call_fut = service.call(request);

        task::spawn(async move {
            let (mut actual, send_response) = handle.next_request().await.unwrap();

            assert_that!(actual.method()).is_equal_to(&Method::POST);
            let body: Value =
                serde_json::from_slice(&body_to_bytes(actual.body_mut()).await.unwrap()).unwrap();
            assert_that!(body.get("query")).is_none();
            assert_that!(body.get("variables").unwrap()).is_equal_to(&json!({"variable": 7}));
            assert_that!(body.get("extensions").unwrap()).is_equal_to(&expected_extensions());

            let response = http::Response::builder()
                .body(Bytes::from(
                    serde_json::to_vec(&json!({"data": {"__typename": "Query"}})).unwrap(),
                ))
                .unwrap();
            send_response.send_response(response);
        });

        let result = service_call_fut.await;
        assert_that!(result).is_ok();
    }

    #[tokio::test]
    pub async fn test_miss_resends_full_text() {
        let (mock_service, mut handle) = mock::spawn::<HttpRequest, HttpResponse>();
        let mut service = ServiceBuilder::new()
            .layer(PersistedQueryLayer::new(false))
            .map_err(HttpServiceError::Unexpected)
            .service(mock_service.into_inner());
        let service = ServiceExt::<HttpRequest>::ready(&mut service).await.unwrap();

        let request = graphql_request(json!({
            "query": QUERY,
            "operationName": "FetchWidget",
        }));
        let service_call_fut = service.call(request);

        task::spawn(async move {
            let (_, send_response) = handle.next_request().await.unwrap();
            let miss = http::Response::builder()
                .body(Bytes::from(
                    serde_json::to_vec(
                        &json!({"errors": [{"message": "PersistedQueryNotFound"}]}),
                    )
                    .unwrap(),
                ))
                .unwrap();
            send_response.send_response(miss);

            let (mut retry, send_response) = handle.next_request().await.unwrap();
            assert_that!(retry.method()).is_equal_to(&Method::POST);
            let body: Value =
                serde_json::from_slice(&body_to_bytes(retry.body_mut()).await.unwrap()).unwrap();
            assert_that!(body.get("query").unwrap()).is_equal_to(&json!(QUERY));
            assert_that!(body.get("extensions").unwrap()).is_equal_to(&expected_extensions());

            let response = http::Response::builder()
                .body(Bytes::from(
                    serde_json::to_vec(&json!({"data": {"__typename": "Query"}})).unwrap(),
                ))
                .unwrap();
            send_response.send_response(response);
        });

        let result = service_call_fut.await;
        assert_that!(result).is_ok();
    }

    #[tokio::test]
    pub async fn test_hashed_attempt_uses_get_when_configured() {
        let (mock_service, mut handle) = mock::spawn::<HttpRequest, HttpResponse>();
        let mut service = ServiceBuilder::new()
            .layer(PersistedQueryLayer::new(true))
            .map_err(HttpServiceError::Unexpected)
            .service(mock_service.into_inner());
        let service = ServiceExt::<HttpRequest>::ready(&mut service).await.unwrap();

        let request = graphql_request(json!({
            "query": QUERY,
            "operationName": "FetchWidget",
        }));
        let service_call_fut = service.call(request);

        task::spawn(async move {
            let (mut actual, send_response) = handle.next_request().await.unwrap();

            assert_that!(actual.method()).is_equal_to(&Method::GET);
            assert_that!(actual.uri().path()).is_equal_to("/graphql");
            let query_string = actual.uri().query().unwrap().to_string();
            assert_that!(query_string.contains("operationName=FetchWidget")).is_true();
            assert_that!(query_string.contains("extensions=")).is_true();
            let body = body_to_bytes(actual.body_mut()).await.unwrap();
            assert_that!(body.is_empty()).is_true();

            let response = http::Response::builder()
                .body(Bytes::from(
                    serde_json::to_vec(&json!({"data": {"__typename": "Query"}})).unwrap(),
                ))
                .unwrap();
            send_response.send_response(response);
        });

        let result = service_call_fut.await;
        assert_that!(result).is_ok();
    }

    #[tokio::test]
    pub async fn test_request_without_query_passes_through() {
        let (mock_service, mut handle) = mock::spawn::<HttpRequest, HttpResponse>();
        let mut service = ServiceBuilder::new()
            .layer(PersistedQueryLayer::new(false))
            .map_err(HttpServiceError::Unexpected)
            .service(mock_service.into_inner());
        let service = ServiceExt::<HttpRequest>::ready(&mut service).await.unwrap();

        let request = graphql_request(json!({"extensions": {}}));
        let service_call_fut = service.call(request);

        task::spawn(async move {
            let (mut actual, send_response) = handle.next_request().await.unwrap();

            let body: Value =
                serde_json::from_slice(&body_to_bytes(actual.body_mut()).await.unwrap()).unwrap();
            assert_that!(&body).is_equal_to(&json!({"extensions": {}}));

            let response = http::Response::builder()
                .body(Bytes::from(
                    serde_json::to_vec(&json!({"data": null})).unwrap(),
                ))
                .unwrap();
            send_response.send_response(response);
        });

        let result = service_call_fut.await;
        assert_that!(result).is_ok();
    }
}
