use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default matching the production deployment.
#[derive(Debug, Clone)]
pub struct Config {
    pub s3_bucket: String,
    pub resume_key: String,
    pub life_notes_key: String,
    /// Endpoint override for MinIO / LocalStack. `None` uses the AWS default.
    pub s3_endpoint: Option<String>,
    pub aws_region: String,
    pub openai_secret_name: String,
    pub openai_secret_field: String,
    pub openai_base_url: String,
    pub subject_name: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            s3_bucket: var("S3_BUCKET", "ryan-pierce-bot-data"),
            resume_key: var("RESUME_KEY", "Ryan_Pierce_Resume.txt"),
            life_notes_key: var("LIFE_NOTES_KEY", "life_notes.json"),
            s3_endpoint: lookup("S3_ENDPOINT").filter(|v| !v.trim().is_empty()),
            aws_region: var("AWS_REGION", "us-east-1"),
            openai_secret_name: var("OPENAI_SECRET_NAME", "OPENAI_API_KEY"),
            openai_secret_field: var("OPENAI_SECRET_FIELD", "OPENAI_API_KEY"),
            openai_base_url: var("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            subject_name: var("SUBJECT_NAME", "Ryan Pierce"),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}
