use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::FileStore;

/// Base identity for the session: the operator's own credential, saved by
/// `relay auth login` and removed by `relay auth logout`.
///
/// The impersonation chain lives next to this file in the same session
/// directory, keyed separately, so clearing one never corrupts the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorSession {
    pub token: String,
    pub domain: Option<String>,
    pub logged_in_at: DateTime<Utc>,
}

impl OperatorSession {
    pub fn new(token: String, domain: Option<String>) -> Self {
        Self {
            token,
            domain,
            logged_in_at: Utc::now(),
        }
    }
}

pub fn get_session_dir() -> anyhow::Result<PathBuf> {
    let session_dir = if let Ok(custom_dir) = std::env::var("RELAY_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("relay").join("cli")
    };

    if !session_dir.exists() {
        fs::create_dir_all(&session_dir)?;
    }

    Ok(session_dir)
}

/// Store over the session directory, shared by the operator session and the
/// impersonation chain.
pub fn session_store() -> anyhow::Result<FileStore> {
    Ok(FileStore::new(get_session_dir()?))
}

pub fn load_operator_session() -> anyhow::Result<Option<OperatorSession>> {
    let session_dir = get_session_dir()?;
    let session_file = session_dir.join("session.json");

    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(session_file)?;
    let session: OperatorSession = serde_json::from_str(&content)?;
    Ok(Some(session))
}

pub fn save_operator_session(session: &OperatorSession) -> anyhow::Result<()> {
    let session_dir = get_session_dir()?;
    let session_file = session_dir.join("session.json");

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}

pub fn clear_operator_session() -> anyhow::Result<()> {
    let session_dir = get_session_dir()?;
    let session_file = session_dir.join("session.json");

    if session_file.exists() {
        fs::remove_file(session_file)?;
    }
    Ok(())
}
