use clap::Subcommand;
use serde_json::json;

use crate::cli::config::session_store;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::session::{ActorKind, ImpersonationLevel, ImpersonationStack};

#[derive(Subcommand)]
pub enum ImpersonateCommands {
    #[command(about = "Start acting as another actor")]
    Start {
        #[arg(help = "Actor kind: admin, masterPartner, partner, or account")]
        kind: String,
        #[arg(long, help = "Session token for the target actor (reads RELAY_IMPERSONATION_TOKEN if not provided)")]
        token: Option<String>,
        #[arg(long, help = "Tenant domain the target actor is scoped to")]
        domain: Option<String>,
    },

    #[command(about = "Return to the previous identity")]
    Return,

    #[command(about = "Show the identity currently being acted as")]
    Current,

    #[command(about = "List the impersonation chain, oldest first")]
    Chain,

    #[command(about = "Drop the entire impersonation chain")]
    Reset,
}

pub async fn handle(cmd: ImpersonateCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let stack = ImpersonationStack::new(session_store()?);

    match cmd {
        ImpersonateCommands::Start { kind, token, domain } => {
            let kind: ActorKind = kind.parse().map_err(|e| {
                anyhow::anyhow!(
                    "{} (expected one of: {})",
                    e,
                    ActorKind::ALL.map(|k| k.as_str()).join(", ")
                )
            })?;

            let token = match token.or_else(|| std::env::var("RELAY_IMPERSONATION_TOKEN").ok()) {
                Some(t) => t,
                None => {
                    return Err(anyhow::anyhow!(
                        "No token provided. Pass --token or set RELAY_IMPERSONATION_TOKEN"
                    ))
                }
            };

            let mut level = ImpersonationLevel::new(kind, token);
            if let Some(domain) = domain {
                level = level.with_domain(domain);
            }

            stack.push(level)?;
            let depth = stack.depth();

            if depth > config().session.warn_depth {
                eprintln!("Warning: impersonation chain is {} levels deep", depth);
            }

            output_success(
                &output_format,
                &format!("Now acting as {}", kind),
                Some(json!({ "depth": depth })),
            )?;

            Ok(())
        }
        ImpersonateCommands::Return => {
            match stack.pop()? {
                Some(left) => {
                    let now_acting = match stack.peek() {
                        Some(level) => level.kind.to_string(),
                        None => "yourself".to_string(),
                    };

                    output_success(
                        &output_format,
                        &format!("Returned from {}, now acting as {}", left.kind, now_acting),
                        Some(json!({
                            "popped": { "type": left.kind.as_str(), "domain": left.domain },
                            "depth": stack.depth()
                        })),
                    )?;
                }
                None => {
                    output_success(
                        &output_format,
                        "No impersonation to return from",
                        Some(json!({ "popped": null, "depth": 0 })),
                    )?;
                }
            }

            Ok(())
        }
        ImpersonateCommands::Current => {
            match stack.peek() {
                Some(level) => output_active_level(&output_format, &level, stack.depth())?,
                None => output_not_impersonating(&output_format)?,
            }

            Ok(())
        }
        ImpersonateCommands::Chain => {
            let levels = stack.stack();

            if levels.is_empty() {
                return output_empty_collection(&output_format, "levels", "Not impersonating anyone");
            }

            match output_format {
                OutputFormat::Json => {
                    let entries: Vec<_> = levels
                        .iter()
                        .enumerate()
                        .map(|(i, level)| {
                            json!({
                                "position": i + 1,
                                "type": level.kind.as_str(),
                                "domain": level.domain,
                                "token": token_preview(&level.token),
                                "active": i + 1 == levels.len()
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({"levels": entries}))?);
                }
                OutputFormat::Text => {
                    println!("{:<3} {:<15} {:<25} {}", "#", "KIND", "DOMAIN", "TOKEN");
                    println!("{}", "-".repeat(60));

                    for (i, level) in levels.iter().enumerate() {
                        let active_marker = if i + 1 == levels.len() { "*" } else { " " };
                        let domain = level.domain.as_deref().unwrap_or("-");

                        println!(
                            "{}{:<2} {:<15} {:<25} {}",
                            active_marker,
                            i + 1,
                            level.kind.to_string(),
                            domain,
                            token_preview(&level.token)
                        );
                    }
                }
            }

            Ok(())
        }
        ImpersonateCommands::Reset => {
            let dropped = stack.depth();
            stack.clear()?;

            output_success(
                &output_format,
                "Impersonation chain cleared",
                Some(json!({ "dropped": dropped })),
            )?;

            Ok(())
        }
    }
}
