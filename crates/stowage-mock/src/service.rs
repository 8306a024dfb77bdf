//! HTTP surface: routing, dispatch, and response serialization.
//!
//! Requests flow through a short pipeline: health-check interception,
//! path-style route resolution, body collection (with AWS-chunked
//! de-framing), dispatch against [`MockS3State`], and error formatting as
//! the S3 `<Error>` document. Every response carries an `x-amz-request-id`.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode, header::HeaderValue};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::Service;
use percent_encoding::percent_decode_str;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::codec;
use crate::error::{MockS3Error, error_to_xml};
use crate::state::MockS3State;

/// Region reported for every bucket. Single-region endpoint.
const ENDPOINT_REGION: &str = "us-east-1";

/// Health probe path, matching the LocalStack convention the original
/// orchestration stack expects.
const HEALTH_PATH: &str = "/_localstack/health";

/// A resolved S3 operation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MockOperation {
    CreateBucket { bucket: String },
    HeadBucket { bucket: String },
    PutObject { bucket: String, key: String },
    GetObject { bucket: String, key: String },
    Health,
}

/// Resolve a path-style request to an operation.
fn route(method: &Method, path: &str) -> Result<MockOperation, MockS3Error> {
    if method == Method::GET && path == HEALTH_PATH {
        return Ok(MockOperation::Health);
    }

    let trimmed = path.trim_start_matches('/');
    let (bucket, key) = match trimmed.split_once('/') {
        Some((bucket, key)) if !key.is_empty() => (bucket, Some(key)),
        Some((bucket, _)) => (bucket, None),
        None => (trimmed, None),
    };

    if bucket.is_empty() {
        return Err(MockS3Error::NotImplemented(format!("{method} {path}")));
    }

    let bucket = decode_component(bucket)?;
    let key = key.map(decode_component).transpose()?;

    match (method, key) {
        (&Method::PUT, None) => Ok(MockOperation::CreateBucket { bucket }),
        (&Method::HEAD, None) => Ok(MockOperation::HeadBucket { bucket }),
        (&Method::PUT, Some(key)) => Ok(MockOperation::PutObject { bucket, key }),
        (&Method::GET, Some(key)) => Ok(MockOperation::GetObject { bucket, key }),
        (method, _) => Err(MockS3Error::NotImplemented(format!("{method} {path}"))),
    }
}

/// Percent-decode one path component.
fn decode_component(raw: &str) -> Result<String, MockS3Error> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| MockS3Error::MalformedBody(format!("path component '{raw}' is not UTF-8")))
}

/// The hyper service backing the simulated endpoint.
#[derive(Debug, Clone)]
pub struct MockS3Service {
    state: Arc<MockS3State>,
}

impl MockS3Service {
    /// Create a service over shared state.
    #[must_use]
    pub fn new(state: Arc<MockS3State>) -> Self {
        Self { state }
    }
}

impl Service<Request<Incoming>> for MockS3Service {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let mut response = process_request(&state, req, &request_id).await;

            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response.headers_mut().insert("x-amz-request-id", value);
            }

            Ok(response)
        })
    }
}

/// Run one request through routing, body collection, and dispatch.
async fn process_request(
    state: &MockS3State,
    req: Request<Incoming>,
    request_id: &str,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    debug!(%method, %path, request_id, "processing request");

    let op = match route(&method, &path) {
        Ok(op) => op,
        Err(err) => {
            warn!(%method, %path, error = %err, request_id, "failed to route request");
            return error_response(&err, &path, request_id, &method);
        }
    };

    let (parts, incoming) = req.into_parts();
    let body = match incoming.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, request_id, "failed to collect request body");
            let err = MockS3Error::MalformedBody("failed to read request body".to_owned());
            return error_response(&err, &path, request_id, &method);
        }
    };

    match dispatch(state, op, &parts, body) {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "operation returned error");
            error_response(&err, &path, request_id, &method)
        }
    }
}

/// Dispatch a resolved operation against the state.
fn dispatch(
    state: &MockS3State,
    op: MockOperation,
    parts: &http::request::Parts,
    body: Bytes,
) -> Result<Response<Full<Bytes>>, MockS3Error> {
    match op {
        MockOperation::Health => Ok(health_response()),

        MockOperation::CreateBucket { bucket } => {
            state.create_bucket(&bucket, ENDPOINT_REGION)?;
            builder(StatusCode::OK)
                .header("Location", format!("/{bucket}"))
                .body(Full::new(Bytes::new()))
                .map_err(|e| MockS3Error::MalformedBody(e.to_string()))
        }

        MockOperation::HeadBucket { bucket } => {
            let region = state.head_bucket(&bucket)?;
            builder(StatusCode::OK)
                .header("x-amz-bucket-region", region)
                .body(Full::new(Bytes::new()))
                .map_err(|e| MockS3Error::MalformedBody(e.to_string()))
        }

        MockOperation::PutObject { bucket, key } => {
            let payload = if codec::is_aws_chunked(&parts.headers) {
                codec::decode_aws_chunked(&body)?
            } else {
                body
            };
            let content_type = parts
                .headers
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);

            let e_tag = state.put_object(&bucket, &key, payload, content_type)?;
            builder(StatusCode::OK)
                .header("ETag", e_tag)
                .body(Full::new(Bytes::new()))
                .map_err(|e| MockS3Error::MalformedBody(e.to_string()))
        }

        MockOperation::GetObject { bucket, key } => {
            let object = state.get_object(&bucket, &key)?;

            let mut response = builder(StatusCode::OK)
                .header("ETag", object.e_tag)
                .header(http::header::CONTENT_LENGTH, object.body.len())
                .header(
                    http::header::LAST_MODIFIED,
                    object
                        .last_modified
                        .format("%a, %d %b %Y %H:%M:%S GMT")
                        .to_string(),
                );
            if let Some(content_type) = object.content_type {
                response = response.header(http::header::CONTENT_TYPE, content_type);
            }
            response
                .body(Full::new(object.body))
                .map_err(|e| MockS3Error::MalformedBody(e.to_string()))
        }
    }
}

/// Base response builder with the headers every response shares.
fn builder(status: StatusCode) -> http::response::Builder {
    Response::builder().status(status).header("Server", "stowage-mock")
}

/// Health probe body.
fn health_response() -> Response<Full<Bytes>> {
    builder(StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(
            br#"{"services":{"s3":"running"}}"#,
        )))
        .expect("static response")
}

/// Render an error as the S3 XML document.
///
/// HEAD responses must not carry a body; the status code alone tells the
/// client what happened.
fn error_response(
    err: &MockS3Error,
    resource: &str,
    request_id: &str,
    method: &Method,
) -> Response<Full<Bytes>> {
    let body = if method == Method::HEAD {
        Bytes::new()
    } else {
        Bytes::from(error_to_xml(err, resource, request_id))
    };

    builder(err.status_code())
        .header(http::header::CONTENT_TYPE, "application/xml")
        .body(Full::new(body))
        .expect("static response")
}
