use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::config::config;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let base_url = &config().api.base_url;
    let client = ApiClient::from_config()?;

    if client.ping().await {
        output_success(
            &output_format,
            &format!("{} is reachable", base_url),
            Some(json!({ "base_url": base_url })),
        )
    } else {
        Err(anyhow::anyhow!("API at {} is not reachable", base_url))
    }
}
