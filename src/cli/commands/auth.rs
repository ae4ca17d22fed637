use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::client::{ApiClient, Credential};
use crate::session::ImpersonationStack;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Save the operator credential for this session")]
    Login {
        #[arg(long, help = "Operator API token (reads RELAY_TOKEN if not provided)")]
        token: Option<String>,
        #[arg(long, help = "Tenant domain to scope the session to")]
        domain: Option<String>,
    },

    #[command(about = "Forget the operator credential and any impersonation chain")]
    Logout,

    #[command(about = "Show session and impersonation status")]
    Status,

    #[command(about = "Ask the API who the active credential authenticates as")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { token, domain } => {
            let token = match token.or_else(|| std::env::var("RELAY_TOKEN").ok()) {
                Some(t) if !t.trim().is_empty() => t,
                _ => {
                    return Err(anyhow::anyhow!(
                        "No token provided. Pass --token or set RELAY_TOKEN"
                    ))
                }
            };

            // A fresh login starts a fresh session: any chain assumed under
            // the previous credential is no longer valid.
            let stack = ImpersonationStack::new(session_store()?);
            let stale_levels = stack.depth();
            if stale_levels > 0 {
                stack.clear()?;
            }

            let session = OperatorSession::new(token, domain.clone());
            save_operator_session(&session)?;

            output_success(
                &output_format,
                "Logged in",
                Some(json!({
                    "domain": domain,
                    "dropped_impersonation_levels": stale_levels
                })),
            )?;

            Ok(())
        }
        AuthCommands::Logout => {
            let stack = ImpersonationStack::new(session_store()?);
            let dropped = stack.depth();
            stack.clear()?;
            clear_operator_session()?;

            output_success(
                &output_format,
                "Logged out",
                Some(json!({ "dropped_impersonation_levels": dropped })),
            )?;

            Ok(())
        }
        AuthCommands::Status => {
            let session = load_operator_session()?;
            let stack = ImpersonationStack::new(session_store()?);
            let active = stack.peek();
            let depth = stack.depth();

            match output_format {
                OutputFormat::Json => {
                    let operator = session.as_ref().map(|s| {
                        json!({
                            "token": token_preview(&s.token),
                            "domain": s.domain,
                            "logged_in_at": s.logged_in_at
                        })
                    });
                    let impersonation = active.as_ref().map(|level| {
                        json!({
                            "type": level.kind.as_str(),
                            "domain": level.domain,
                            "depth": depth
                        })
                    });

                    println!("{}", serde_json::to_string_pretty(&json!({
                        "logged_in": session.is_some(),
                        "operator": operator,
                        "impersonation": impersonation
                    }))?);
                }
                OutputFormat::Text => {
                    match &session {
                        Some(s) => {
                            println!("Logged in since: {}", s.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC"));
                            if let Some(domain) = &s.domain {
                                println!("Session domain: {}", domain);
                            }
                            println!("Operator token: {}", token_preview(&s.token));
                        }
                        None => println!("Not logged in"),
                    }

                    match &active {
                        Some(level) => {
                            println!();
                            output_active_level(&output_format, level, depth)?;
                        }
                        None => println!("Not impersonating anyone"),
                    }
                }
            }

            Ok(())
        }
        AuthCommands::Whoami => {
            let credential = active_credential()?;
            let client = ApiClient::from_config()?;
            let identity = client.whoami(&credential).await?;

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "type": identity.kind.as_str(),
                        "name": identity.name,
                        "domain": identity.domain
                    }))?);
                }
                OutputFormat::Text => {
                    println!("{} ({})", identity.name, identity.kind);
                    if let Some(domain) = &identity.domain {
                        println!("Domain: {}", domain);
                    }
                }
            }

            Ok(())
        }
    }
}

/// The credential requests should go out with right now: the top of the
/// impersonation chain when one exists, otherwise the operator's own.
pub fn active_credential() -> anyhow::Result<Credential> {
    let stack = ImpersonationStack::new(session_store()?);
    if let Some(level) = stack.peek() {
        return Ok(Credential::from(&level));
    }

    match load_operator_session()? {
        Some(session) => {
            let mut credential = Credential::new(session.token);
            if let Some(domain) = session.domain {
                credential = credential.with_domain(domain);
            }
            Ok(credential)
        }
        None => Err(anyhow::anyhow!(
            "Not logged in. Use 'relay auth login' first"
        )),
    }
}
