use aws_sdk_secretsmanager::Client as SecretsClient;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secrets Manager request for '{name}' failed: {message}")]
    Service { name: String, message: String },

    #[error("Secret '{0}' has no string value")]
    MissingString(String),

    #[error("Secret '{name}' is not a JSON object: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Secret '{name}' has no non-empty string field '{field}'")]
    MissingField { name: String, field: String },
}

/// Fetches the completion-API key once at startup.
/// Any error here is fatal for the process.
pub async fn fetch_api_key(
    client: &SecretsClient,
    name: &str,
    field: &str,
) -> Result<String, SecretError> {
    let output = client
        .get_secret_value()
        .secret_id(name)
        .send()
        .await
        .map_err(|e| SecretError::Service {
            name: name.to_string(),
            message: aws_sdk_secretsmanager::error::DisplayErrorContext(e).to_string(),
        })?;

    let secret_string = output
        .secret_string()
        .ok_or_else(|| SecretError::MissingString(name.to_string()))?;

    let key = extract_field(name, secret_string, field)?;
    info!("Retrieved API key from secret '{name}'");
    Ok(key)
}

/// Pulls `field` out of a secret string shaped like `{"FIELD": "value", ...}`.
fn extract_field(name: &str, secret_string: &str, field: &str) -> Result<String, SecretError> {
    let parsed: Value =
        serde_json::from_str(secret_string).map_err(|source| SecretError::Malformed {
            name: name.to_string(),
            source,
        })?;

    parsed
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SecretError::MissingField {
            name: name.to_string(),
            field: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_named_field() {
        let key = extract_field(
            "OPENAI_API_KEY",
            r#"{"OPENAI_API_KEY": "sk-abc", "OTHER": "x"}"#,
            "OPENAI_API_KEY",
        )
        .unwrap();
        assert_eq!(key, "sk-abc");
    }

    #[test]
    fn test_missing_or_empty_field_is_an_error() {
        assert!(matches!(
            extract_field("s", r#"{"OTHER": "x"}"#, "OPENAI_API_KEY"),
            Err(SecretError::MissingField { .. })
        ));
        assert!(matches!(
            extract_field("s", r#"{"OPENAI_API_KEY": "  "}"#, "OPENAI_API_KEY"),
            Err(SecretError::MissingField { .. })
        ));
        assert!(matches!(
            extract_field("s", r#"{"OPENAI_API_KEY": 42}"#, "OPENAI_API_KEY"),
            Err(SecretError::MissingField { .. })
        ));
    }

    #[test]
    fn test_plain_text_secret_is_malformed() {
        assert!(matches!(
            extract_field("s", "sk-abc", "OPENAI_API_KEY"),
            Err(SecretError::Malformed { .. })
        ));
    }
}
