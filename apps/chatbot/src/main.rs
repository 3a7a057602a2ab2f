mod chat;
mod config;
mod cors;
mod errors;
mod lambda;
mod llm_client;
mod routes;
mod secrets;
mod state;
mod storage;
#[cfg(test)]
mod test_utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::{build_local_router, build_router};
use crate::secrets::fetch_api_key;
use crate::state::AppState;
use crate::storage::S3DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let in_lambda = std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok();

    init_tracing(&config, in_lambda);
    info!("Starting resume-chatbot v{}", env!("CARGO_PKG_VERSION"));

    let aws = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await;

    // Fatal on failure: no requests are served without a key.
    let secrets = aws_sdk_secretsmanager::Client::new(&aws);
    let api_key = fetch_api_key(
        &secrets,
        &config.openai_secret_name,
        &config.openai_secret_field,
    )
    .await
    .context("OpenAI API key could not be retrieved")?;

    let llm = LlmClient::new(api_key, &config.openai_base_url)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let s3 = build_s3_client(&aws, &config);
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let state = AppState {
        documents: Arc::new(S3DocumentStore::new(s3, config.s3_bucket.clone())),
        completions: Arc::new(llm),
        config: config.clone(),
    };

    if in_lambda {
        let app = build_router(state);
        lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
            lambda::handle(event, &app)
        }))
        .await
        .map_err(|e| anyhow::anyhow!(e))
    } else {
        serve_local(state, config.port).await
    }
}

fn init_tracing(config: &Config, in_lambda: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if in_lambda {
        // CloudWatch adds the ingestion time.
        registry
            .with(fmt::layer().without_time().with_target(false))
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn serve_local(state: AppState, port: u16) -> Result<()> {
    let app = build_local_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// S3 client from the shared AWS config, pointed at MinIO / LocalStack when
/// `S3_ENDPOINT` is set.
fn build_s3_client(aws: &SdkConfig, config: &Config) -> aws_sdk_s3::Client {
    let mut builder = aws_sdk_s3::config::Builder::from(aws);
    if let Some(endpoint) = &config.s3_endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }
    aws_sdk_s3::Client::from_conf(builder.build())
}
