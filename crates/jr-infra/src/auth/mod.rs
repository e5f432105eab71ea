mod watch_session;

pub use watch_session::WatchAuthSession;
