use std::time::Duration;

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args, Debug)]
pub struct HealthArgs {
    #[arg(long, help = "Server base URL (defaults to http://localhost:<API_PORT>)")]
    pub url: Option<String>,
}

pub async fn handle(args: HealthArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = args
        .url
        .unwrap_or_else(|| format!("http://localhost:{}", config::config().api.port));
    let endpoint = url::Url::parse(&base)
        .and_then(|u| u.join("/health"))
        .with_context(|| format!("invalid server URL: {}", base))?;

    let client = reqwest::Client::builder().timeout(Duration::from_secs(5)).build()?;
    let response = client
        .get(endpoint.clone())
        .send()
        .await
        .with_context(|| format!("failed to reach {}", endpoint))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(output_format, &format!("{} is healthy", base), Some(body))
    } else {
        output_error(
            output_format,
            &format!("{} reported {}", base, status),
            body.get("code").and_then(Value::as_str),
        )?;
        anyhow::bail!("server unhealthy: {}", status)
    }
}
