use serde::{Deserialize, Serialize};

/// Pagination state of an entry list.
///
/// Design principle: this is a pure type state machine with only state
/// definitions and transition validation. Fetching, caching and cancellation
/// are handled by the application layer (jr-app).
///
/// State transitions:
///
/// ```text
/// Idle ──────→ LoadingFirstPage ──→ Idle (full page)
///  │  ↑                        └──→ Exhausted (short page)
///  │  └──────── (failure) ─────┘
///  │
///  └─→ LoadingNextPage ──→ Idle | Exhausted
///
/// Exhausted ──→ LoadingFirstPage (explicit reload)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncState {
    /// No page request in flight; more pages may exist.
    #[default]
    Idle,
    LoadingFirstPage,
    LoadingNextPage,
    /// The most recent fetch returned fewer than a full page.
    Exhausted,
}

impl SyncState {
    /// Check if a remote read is currently in flight
    pub fn is_loading(self) -> bool {
        matches!(self, Self::LoadingFirstPage | Self::LoadingNextPage)
    }

    pub fn is_exhausted(self) -> bool {
        self == Self::Exhausted
    }

    /// Start loading the first page. Refused while another read is in flight.
    pub fn start_first_page(self) -> Option<Self> {
        match self {
            Self::Idle | Self::Exhausted => Some(Self::LoadingFirstPage),
            _ => None,
        }
    }

    /// Start loading the next page. Only allowed from `Idle`.
    pub fn start_next_page(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::LoadingNextPage),
            _ => None,
        }
    }

    /// Transition after a page arrived.
    pub fn on_page_loaded(self, has_more: bool) -> Self {
        match self {
            Self::LoadingFirstPage | Self::LoadingNextPage if has_more => Self::Idle,
            Self::LoadingFirstPage | Self::LoadingNextPage => Self::Exhausted,
            _ => self,
        }
    }

    /// Transition after a page request failed.
    pub fn on_page_failed(self) -> Self {
        match self {
            Self::LoadingFirstPage | Self::LoadingNextPage => Self::Idle,
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_is_refused_while_loading() {
        assert_eq!(SyncState::Idle.start_first_page(), Some(SyncState::LoadingFirstPage));
        assert_eq!(
            SyncState::Exhausted.start_first_page(),
            Some(SyncState::LoadingFirstPage)
        );
        assert_eq!(SyncState::LoadingFirstPage.start_first_page(), None);
        assert_eq!(SyncState::LoadingNextPage.start_first_page(), None);
    }

    #[test]
    fn next_page_only_starts_from_idle() {
        assert_eq!(SyncState::Idle.start_next_page(), Some(SyncState::LoadingNextPage));
        assert_eq!(SyncState::Exhausted.start_next_page(), None);
        assert_eq!(SyncState::LoadingFirstPage.start_next_page(), None);
        assert_eq!(SyncState::LoadingNextPage.start_next_page(), None);
    }

    #[test]
    fn page_results_settle_loading_states() {
        assert_eq!(SyncState::LoadingNextPage.on_page_loaded(true), SyncState::Idle);
        assert_eq!(SyncState::LoadingNextPage.on_page_loaded(false), SyncState::Exhausted);
        assert_eq!(SyncState::LoadingFirstPage.on_page_failed(), SyncState::Idle);
        assert_eq!(SyncState::Exhausted.on_page_failed(), SyncState::Exhausted);
        assert_eq!(SyncState::Idle.on_page_loaded(false), SyncState::Idle);
    }
}
