use tracing::{debug, warn};

use super::error::SessionError;
use super::level::ImpersonationLevel;
use super::store::SessionStore;

/// Store key holding the impersonation chain. The name is part of the
/// persisted session contract shared with other platform clients.
pub const STACK_KEY: &str = "impersonationStack";

/// Ordered chain of assumed identities, most recent last.
///
/// The manager owns its store handle and is the only writer of [`STACK_KEY`]
/// for that store. It records which identities have been assumed; swapping
/// the credential used for outgoing requests is the caller's job.
///
/// Every mutation is a full read-modify-write of the persisted value. That
/// is safe within one process, but two processes sharing a session directory
/// can interleave cycles and the last write wins. Operators running parallel
/// `relay` invocations against the same session should expect that.
pub struct ImpersonationStack<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> ImpersonationStack<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The full chain, oldest assumption first.
    ///
    /// This is the canonical read path: an absent key or a persisted value
    /// that no longer decodes yields an empty chain rather than an error, so
    /// a damaged session file can never lock an operator out.
    pub fn stack(&self) -> Vec<ImpersonationLevel> {
        let Some(raw) = self.store.get(STACK_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(levels) => levels,
            Err(e) => {
                warn!(error = %e, "Discarding malformed impersonation stack");
                Vec::new()
            }
        }
    }

    /// Record a newly assumed identity as the active one.
    ///
    /// The token must be non-blank. Validation happens before anything is
    /// read or written, so a rejected push leaves the chain untouched.
    pub fn push(&self, level: ImpersonationLevel) -> Result<(), SessionError> {
        if level.token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let kind = level.kind;
        let domain_scoped = level.domain.is_some();

        let mut levels = self.stack();
        levels.push(level);
        self.persist(&levels)?;

        debug!(kind = %kind, domain_scoped, depth = levels.len(), "Impersonation level pushed");
        Ok(())
    }

    /// Drop the most recently assumed identity and return it, so the caller
    /// knows which context it is leaving. Popping an empty chain is a normal
    /// outcome: it returns `None` and writes nothing.
    pub fn pop(&self) -> Result<Option<ImpersonationLevel>, SessionError> {
        let mut levels = self.stack();
        let Some(level) = levels.pop() else {
            return Ok(None);
        };
        self.persist(&levels)?;

        debug!(kind = %level.kind, depth = levels.len(), "Impersonation level popped");
        Ok(Some(level))
    }

    /// The currently active identity, without mutating anything. `None`
    /// means the operator is acting as themselves.
    pub fn peek(&self) -> Option<ImpersonationLevel> {
        self.stack().pop()
    }

    /// Forget the entire chain. Afterwards the store no longer holds the
    /// stack key at all, which reads back as an empty chain.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.remove(STACK_KEY)?;
        debug!("Impersonation stack cleared");
        Ok(())
    }

    /// Number of currently assumed identities.
    pub fn depth(&self) -> usize {
        self.stack().len()
    }

    pub fn is_impersonating(&self) -> bool {
        self.depth() > 0
    }

    /// Direct access to the underlying store, for callers that keep other
    /// session state next to the stack.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self, levels: &[ImpersonationLevel]) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(levels)?;
        self.store.set(STACK_KEY, &raw)?;
        Ok(())
    }
}
