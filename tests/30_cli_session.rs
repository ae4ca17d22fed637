mod common;

use anyhow::Result;
use relay_cli::cli::commands::{auth, impersonate};
use relay_cli::cli::config::load_operator_session;
use relay_cli::cli::OutputFormat;
use relay_cli::session::{ActorKind, ImpersonationLevel};

// One flow in one test: the session directory is selected through the
// process-wide RELAY_CLI_CONFIG_DIR variable, so the steps have to run
// sequentially rather than as parallel tests.
#[tokio::test]
async fn login_impersonate_return_logout_flow() -> Result<()> {
    let dir = common::SessionDir::new();
    std::env::set_var("RELAY_CLI_CONFIG_DIR", dir.path());

    // A chain assumed under an earlier credential is dropped by a fresh login.
    dir.stack()
        .push(ImpersonationLevel::new(ActorKind::Admin, "stale-token"))?;

    auth::handle(
        auth::AuthCommands::Login {
            token: Some("op-token".to_string()),
            domain: Some("hq.example.com".to_string()),
        },
        OutputFormat::Json,
    )
    .await?;

    let session = load_operator_session()?.expect("login saved the operator session");
    assert_eq!(session.token, "op-token");
    assert_eq!(session.domain.as_deref(), Some("hq.example.com"));
    assert_eq!(dir.stack().depth(), 0);

    // Unknown actor kinds are rejected before anything is recorded.
    let err = impersonate::handle(
        impersonate::ImpersonateCommands::Start {
            kind: "superuser".to_string(),
            token: Some("t".to_string()),
            domain: None,
        },
        OutputFormat::Json,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("superuser"));
    assert_eq!(dir.stack().depth(), 0);

    // So are blank tokens.
    assert!(impersonate::handle(
        impersonate::ImpersonateCommands::Start {
            kind: "partner".to_string(),
            token: Some("   ".to_string()),
            domain: None,
        },
        OutputFormat::Json,
    )
    .await
    .is_err());
    assert_eq!(dir.stack().depth(), 0);

    impersonate::handle(
        impersonate::ImpersonateCommands::Start {
            kind: "partner".to_string(),
            token: Some("p-token".to_string()),
            domain: Some("d1.example.com".to_string()),
        },
        OutputFormat::Json,
    )
    .await?;

    let acting = dir.stack().peek().expect("start pushed a level");
    assert_eq!(acting.kind, ActorKind::Partner);
    assert_eq!(acting.domain.as_deref(), Some("d1.example.com"));

    impersonate::handle(impersonate::ImpersonateCommands::Return, OutputFormat::Json).await?;
    assert_eq!(dir.stack().depth(), 0);

    // Returning with nothing to return from is a normal outcome.
    impersonate::handle(impersonate::ImpersonateCommands::Return, OutputFormat::Json).await?;

    auth::handle(auth::AuthCommands::Logout, OutputFormat::Json).await?;
    assert!(load_operator_session()?.is_none());
    assert!(!dir.stack_file().exists());

    Ok(())
}
