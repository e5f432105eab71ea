//! Remote entry store adapters.

mod firestore;
mod wire;

pub use firestore::{FirestoreConfig, FirestoreEntriesClient};
