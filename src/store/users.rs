use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::types::User;

/// The in-memory view of the user list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserListSnapshot {
    pub users: Vec<User>,
    /// Matching records at the source, not the length of `users`.
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

/// Issued by [`UserStore::start`]. Only the latest token may resolve a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Holds the user list snapshot and applies the three list transitions.
pub struct UserStore {
    snapshot: watch::Sender<UserListSnapshot>,
    latest: AtomicU64,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(UserListSnapshot::default());
        Self {
            snapshot,
            latest: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> UserListSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UserListSnapshot> {
        self.snapshot.subscribe()
    }

    /// Marks a fetch as in flight and clears any previous error.
    pub fn start(&self) -> RequestToken {
        let token = RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        self.snapshot.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        token
    }

    /// Replaces the list and total verbatim. Returns `false` when `token` has
    /// been superseded by a later `start`, in which case nothing changes.
    pub fn succeed(&self, token: RequestToken, users: Vec<User>, total: u64) -> bool {
        if !self.is_latest(token) {
            debug!(?token, "discarding superseded list result");
            return false;
        }
        self.snapshot.send_modify(|state| {
            state.loading = false;
            state.users = users;
            state.total = total;
        });
        true
    }

    /// Records a failed fetch. The previous list and total stay visible.
    pub fn fail(&self, token: RequestToken, message: String) -> bool {
        if !self.is_latest(token) {
            debug!(?token, "discarding superseded list failure");
            return false;
        }
        self.snapshot.send_modify(|state| {
            state.loading = false;
            state.error = Some(message);
        });
        true
    }

    fn is_latest(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
