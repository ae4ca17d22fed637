pub mod error;
pub mod level;
pub mod stack;
pub mod store;

pub use error::SessionError;
pub use level::{ActorKind, ImpersonationLevel};
pub use stack::{ImpersonationStack, STACK_KEY};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
