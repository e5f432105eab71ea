//! Entry list synchronization models and the per-identity session state machine.

pub mod error;
pub mod page;
pub mod session;
pub mod state;
pub mod view;

pub use error::SyncError;
pub use page::{EntryPage, PageCursor, PageKind, PageRequest};
pub use session::{PageApplied, SessionGeneration, SyncSession};
pub use state::SyncState;
pub use view::EntryListView;

/// Number of entries requested per remote page. Policy constant.
pub const PAGE_SIZE: usize = 10;
