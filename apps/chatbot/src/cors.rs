use axum::http::{header, HeaderMap, HeaderValue};

/// `Access-Control-Allow-Origin: *`, carried by every response.
pub fn allow_origin() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers
}

/// Full CORS set for preflight and successful replies.
pub fn allow_chat() -> HeaderMap {
    let mut headers = allow_origin();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("OPTIONS, POST"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
}
