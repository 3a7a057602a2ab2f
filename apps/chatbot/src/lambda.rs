//! Lambda edge: raw API Gateway event in, proxy response out.
//!
//! Events are accepted as untyped JSON and decoded with `lambda_http`, so a
//! shape it rejects still reaches the chat handler instead of failing inside
//! the runtime.

use aws_lambda_events::{apigw::ApiGatewayProxyResponse, encodings::Body as EventBody};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use lambda_runtime::LambdaEvent;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing::{info, warn};

pub async fn handle(
    event: LambdaEvent<Value>,
    app: &Router,
) -> Result<ApiGatewayProxyResponse, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    info!("Lambda invocation {}", context.request_id);
    Ok(dispatch_event(app.clone(), &payload).await)
}

/// Runs one event through the router. Never fails.
pub async fn dispatch_event(app: Router, event: &Value) -> ApiGatewayProxyResponse {
    let request = into_http_request(event);
    let response = app.oneshot(request).await.unwrap_or_else(|e| match e {});

    let (parts, body) = response.into_parts();
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => ApiGatewayProxyResponse {
            status_code: i64::from(parts.status.as_u16()),
            headers: parts.headers,
            multi_value_headers: Default::default(),
            body: Some(EventBody::Text(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
            is_base64_encoded: false,
        },
        Err(e) => {
            warn!("Failed to read response body: {e}");
            ApiGatewayProxyResponse {
                status_code: i64::from(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                headers: crate::cors::allow_origin(),
                multi_value_headers: Default::default(),
                body: Some(EventBody::Text(
                    json!({ "error": "Internal Server Error" }).to_string(),
                )),
                is_base64_encoded: false,
            }
        }
    }
}

fn into_http_request(event: &Value) -> Request<Body> {
    match lambda_http::request::from_str(&event.to_string()) {
        Ok(request) => request.map(|body| Body::from(body.to_vec())),
        Err(e) => {
            warn!("Event is not a recognised API Gateway shape: {e}");
            lenient_request(event)
        }
    }
}

/// Reads what it can from an event `lambda_http` rejected. The method falls
/// back to `GET` so it is rejected like any other unsupported method; a body
/// that is not a string is dropped.
fn lenient_request(event: &Value) -> Request<Body> {
    let method = event
        .get("httpMethod")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            event
                .pointer("/requestContext/http/method")
                .and_then(Value::as_str)
        })
        .and_then(|m| Method::from_bytes(m.as_bytes()).ok())
        .unwrap_or(Method::GET);

    let body = event
        .get("body")
        .and_then(Value::as_str)
        .map(|b| Body::from(b.to_string()))
        .unwrap_or_else(Body::empty);

    let mut request = Request::new(body);
    *request.method_mut() = method;
    request
}
