use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SessionError;

/// Actor kinds an operator can impersonate, from most to least privileged.
///
/// Serialized names are the platform wire names and are shared with every
/// other client that reads the persisted session, so they stay camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "masterPartner")]
    MasterPartner,
    #[serde(rename = "partner")]
    Partner,
    #[serde(rename = "account")]
    Account,
}

impl ActorKind {
    pub const ALL: [ActorKind; 4] = [
        ActorKind::Admin,
        ActorKind::MasterPartner,
        ActorKind::Partner,
        ActorKind::Account,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::Admin => "admin",
            ActorKind::MasterPartner => "masterPartner",
            ActorKind::Partner => "partner",
            ActorKind::Account => "account",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(ActorKind::Admin),
            "masterPartner" => Ok(ActorKind::MasterPartner),
            "partner" => Ok(ActorKind::Partner),
            "account" => Ok(ActorKind::Account),
            other => Err(SessionError::UnknownActorKind(other.to_string())),
        }
    }
}

/// One assumed identity: who the operator is acting as, the opaque session
/// token issued for that actor, and the tenant domain when the actor is
/// scoped to one.
///
/// The `token` is never inspected here; it is carried verbatim and handed to
/// the API client when this level is the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpersonationLevel {
    #[serde(rename = "type")]
    pub kind: ActorKind,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl ImpersonationLevel {
    pub fn new(kind: ActorKind, token: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}
