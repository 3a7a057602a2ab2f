//! The chat endpoint: one request in, one JSON response out.
//!
//! Evaluation order is fixed: preflight, document load, method check, payload.
//! A storage outage therefore yields 500 even for methods that would be 405.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::chat::prompts::build_system_prompt;
use crate::cors;
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::{load_reference_documents, ReferenceDocuments};

pub async fn handle_chat(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response, AppError> {
    info!("Received {method} request");

    if method == Method::OPTIONS {
        info!("Handling CORS preflight request");
        return Ok(ok_json(json!({ "message": "CORS preflight successful" })));
    }

    let docs = load_reference_documents(state.documents.as_ref(), &state.config)
        .await
        .ok_or(AppError::ReferenceDataUnavailable)?;

    if method != Method::POST {
        return Err(AppError::MethodNotAllowed(method));
    }

    answer_query(&state, &docs, &body).await
}

async fn answer_query(
    state: &AppState,
    docs: &ReferenceDocuments,
    body: &[u8],
) -> Result<Response, AppError> {
    if body.is_empty() {
        return Err(AppError::MissingBody);
    }
    let payload: Value = serde_json::from_slice(body)?;
    let input = payload.to_string();
    info!("User input: {input}");

    let query = extract_query(&payload)?.trim();
    if query.is_empty() {
        return Err(AppError::EmptyQuery);
    }

    let system_prompt = build_system_prompt(&state.config.subject_name, docs, query);
    let reply = state.completions.complete(&system_prompt, query).await?;

    info!("Chatbot response: {reply}");
    Ok(ok_json(json!({ "response": reply })))
}

/// Reads `query` from the decoded body.
///
/// The presence check follows membership semantics for every JSON container:
/// object keys, array elements and substrings of a bare string. A body that
/// passes the check but cannot be indexed by `query` is unreadable.
fn extract_query(payload: &Value) -> Result<&str, AppError> {
    let present = match payload {
        Value::Object(map) => map.contains_key("query"),
        Value::Array(items) => items.iter().any(|item| item == "query"),
        Value::String(text) => text.contains("query"),
        Value::Null | Value::Bool(_) | Value::Number(_) => {
            return Err(AppError::UnreadableBody)
        }
    };
    if !present {
        return Err(AppError::MissingQuery);
    }

    match payload.get("query") {
        Some(Value::String(query)) => Ok(query.as_str()),
        Some(_) => Err(AppError::QueryNotString),
        None => Err(AppError::UnreadableBody),
    }
}

fn ok_json(body: Value) -> Response {
    (StatusCode::OK, cors::allow_chat(), Json(body)).into_response()
}
