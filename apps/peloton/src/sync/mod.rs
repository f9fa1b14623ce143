//! Session synchronizer: per-client mirrors kept current by store
//! notifications.

pub mod identity;
pub mod mirror;
pub mod session;

pub use identity::{FileIdentityStore, IdentityStore, MemoryIdentityStore, PersistedIdentity};
pub use mirror::{Applied, Mirror, MirrorEvent, Snapshot};
pub use session::{load_snapshot, Session};
