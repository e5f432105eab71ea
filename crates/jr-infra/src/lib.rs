//! Infrastructure adapters for the journal: local caches, the remote entry
//! store, the auth session and platform paths.

pub mod auth;
pub mod cache;
pub mod fs;
pub mod remote;
pub mod time;

pub use time::SystemClock;
