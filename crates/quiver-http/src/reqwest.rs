use std::pin::Pin;

use futures::Future;
use tower::{util::BoxCloneService, Service, ServiceBuilder, ServiceExt};

use crate::{body::body_to_bytes, HttpRequest, HttpResponse, HttpService, HttpServiceError};

/// A [`Service`] that wraps a [`reqwest`] client and uses [`http`] constructs for requests and
/// responses. Response bodies are buffered in full before being returned.
#[derive(Clone, Debug)]
pub struct ReqwestService {
    client: BoxCloneService<reqwest::Request, reqwest::Response, HttpServiceError>,
}

impl ReqwestService {
    /// Constructs a new [`ReqwestService`] around an existing [`reqwest::Client`]
    pub fn new(client: reqwest::Client) -> ReqwestService {
        let client = ServiceBuilder::new()
            .map_err(HttpServiceError::from)
            .service(client)
            .boxed_clone();
        ReqwestService { client }
    }
}

impl From<reqwest::Error> for HttpServiceError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_body() {
            HttpServiceError::Body(value.into())
        } else if value.is_connect() {
            HttpServiceError::Connect(value.into())
        } else if value.is_timeout() {
            HttpServiceError::TimedOut
        } else {
            HttpServiceError::Unexpected(value.into())
        }
    }
}

impl Service<HttpRequest> for ReqwestService {
    type Response = HttpResponse;
    type Error = HttpServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.client.poll_ready(cx).map_err(HttpServiceError::from)
    }

    fn call(&mut self, req: HttpRequest) -> Self::Future {
        // https://docs.rs/tower/latest/tower/trait.Service.html#be-careful-when-cloning-inner-services
        let mut client = self.client.clone();
        let fut = async move {
            let mut req = req;
            let bytes = body_to_bytes(req.body_mut())
                .await
                .map_err(|err| HttpServiceError::Body(Box::new(err)))?;
            let body = reqwest::Body::from(bytes);
            let req = req.map(move |_| body);
            let req = reqwest::Request::try_from(req)?;
            let mut resp = http::Response::from(client.call(req).await?);
            let bytes = body_to_bytes(&mut resp)
                .await
                .map_err(|err| HttpServiceError::Body(Box::new(err)))?;
            Ok(resp.map(|_| bytes))
        };
        Box::pin(fut)
    }
}

impl From<ReqwestService> for HttpService {
    fn from(value: ReqwestService) -> Self {
        value.boxed_clone()
    }
}
