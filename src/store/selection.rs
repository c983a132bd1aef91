use tokio::sync::watch;

use crate::types::User;

/// At most one user, handed from the list to the edit form.
pub struct SelectionStore {
    selected: watch::Sender<Option<User>>,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        let (selected, _) = watch::channel(None);
        Self { selected }
    }

    /// Replaces any prior selection with a copy of `user`.
    pub fn select(&self, user: User) {
        self.selected.send_replace(Some(user));
    }

    pub fn clear(&self) {
        self.selected.send_replace(None);
    }

    pub fn selected(&self) -> Option<User> {
        self.selected.borrow().clone()
    }
}
