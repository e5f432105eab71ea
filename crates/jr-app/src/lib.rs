//! Journal Application Orchestration Layer
//!
//! This crate contains the entry synchronization use cases and their runtime
//! orchestration. It depends on `jr-core` ports only; adapters are injected.

pub mod app_paths;
pub mod usecases;

pub use app_paths::AppPaths;
pub use usecases::{AppendOutcome, EntrySyncEngine, IdentityObserver, PageOutcome, ScrollLoader};
