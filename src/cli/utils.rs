use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::config;
use crate::session::ImpersonationLevel;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response.as_object_mut().unwrap().extend(
                    data_value.as_object().unwrap().clone()
                );
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output the active impersonation level in the appropriate format
pub fn output_active_level(
    output_format: &OutputFormat,
    level: &ImpersonationLevel,
    depth: usize,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                "active": {
                    "type": level.kind.as_str(),
                    "domain": level.domain,
                    "token": token_preview(&level.token),
                    "depth": depth
                }
            }))?);
        }
        OutputFormat::Text => {
            println!("Acting as: {}", level.kind);
            if let Some(domain) = &level.domain {
                println!("Domain: {}", domain);
            }
            println!("Token: {}", token_preview(&level.token));
            println!("Depth: {}", depth);
        }
    }
    Ok(())
}

/// Output "not impersonating" in the appropriate format
pub fn output_not_impersonating(output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                "active": null
            }))?);
        }
        OutputFormat::Text => {
            println!("Not impersonating anyone");
        }
    }
    Ok(())
}

/// Shorten a token for display. Full tokens never appear in CLI output:
/// a token that would fit entirely inside the preview is masked outright.
pub fn token_preview(token: &str) -> String {
    let keep = config().session.token_preview_chars;
    if token.chars().count() <= keep {
        return "...".to_string();
    }

    let head: String = token.chars().take(keep).collect();
    format!("{}...", head)
}
