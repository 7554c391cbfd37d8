// src/server/handler.rs
// Routes the two public endpoints onto the health service. Every failure is
// rendered as a response here; the service future itself cannot fail.
use std::convert::Infallible;
use std::sync::Arc;

use hyper::header::{self, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use tower::Service;
use tracing::error;

use crate::health::HealthService;

/// Peers depend on this exact spelling; it is the wire contract.
const CHECK_COMPATABILITY_PATH: &str = "/checkCompatability";

#[derive(Clone)]
pub struct RequestHandler {
    service: Arc<HealthService>,
}

impl RequestHandler {
    pub fn new(service: Arc<HealthService>) -> Self {
        Self { service }
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let service = self.service.clone();
        Box::pin(async move { Ok(route(service, req).await) })
    }
}

async fn route(service: Arc<HealthService>, req: Request<Body>) -> Response<Body> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/health") => health_response(&service).await,
        (&Method::GET, CHECK_COMPATABILITY_PATH) => {
            compatibility_response(&service, req.uri().query())
        }
        (&Method::OPTIONS, CHECK_COMPATABILITY_PATH) => preflight_response(),
        _ => not_found(),
    }
}

async fn health_response(service: &HealthService) -> Response<Body> {
    match service.compute_health().await {
        Ok(health) => json_response(StatusCode::OK, &health),
        Err(err) => {
            error!(%err, "health computation failed");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({ "result": "error" }),
            )
        }
    }
}

fn compatibility_response(service: &HealthService, query: Option<&str>) -> Response<Body> {
    let mut name = String::new();
    let mut version = String::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "name" => name = value.into_owned(),
                "version" => version = value.into_owned(),
                _ => {}
            }
        }
    }

    let result = service.is_compatible_with(&name, &version);
    with_cors(json_response(
        StatusCode::OK,
        &serde_json::json!({ "result": result }),
    ))
}

fn preflight_response() -> Response<Body> {
    with_cors(
        Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET")
            .body(Body::empty())
            .unwrap(),
    )
}

fn not_found() -> Response<Body> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from("Not Found"))
        .unwrap()
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn with_cors(mut response: Response<Body>) -> Response<Body> {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
