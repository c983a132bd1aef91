//! The four user operations and the stores they drive.
//!
//! List writes its outcome into the [`UserStore`]. Add, Update and Delete do
//! not touch the list: they hand back a [`Mutation`] receipt, and the caller
//! re-lists when it wants the snapshot to reflect the change.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::UserService;
use crate::error::{AdminError, Result};
use crate::pagination::Pager;
use crate::store::{SelectionStore, UserStore};
use crate::types::{CreatedUser, NewUser, User, UserPatch};

/// Whether a finished List was written into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Applied,
    /// A later List started before this one resolved.
    Superseded,
}

/// Receipt for a completed mutation.
#[must_use = "the user list is stale until it is fetched again"]
#[derive(Debug)]
pub struct Mutation<T> {
    record: T,
}

impl<T> Mutation<T> {
    fn new(record: T) -> Self {
        Self { record }
    }

    /// Accepts that the list snapshot may be stale.
    pub fn into_record(self) -> T {
        self.record
    }

    /// Re-lists `pager`'s page, then yields the record.
    ///
    /// A failed re-list is recorded in the store as usual and returned here.
    pub async fn refresh<S: UserService>(
        self,
        ops: &UserOperations<S>,
        pager: &Pager,
    ) -> Result<T> {
        ops.list(pager.skip(), pager.limit()).await?;
        Ok(self.record)
    }
}

pub struct UserOperations<S> {
    service: S,
    users: Arc<UserStore>,
    selection: Arc<SelectionStore>,
}

impl<S: UserService> UserOperations<S> {
    pub fn new(service: S) -> Self {
        Self::with_stores(service, Arc::default(), Arc::default())
    }

    pub fn with_stores(service: S, users: Arc<UserStore>, selection: Arc<SelectionStore>) -> Self {
        Self {
            service,
            users,
            selection,
        }
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Fetches `limit` users starting at `skip` into the user store.
    ///
    /// Dispatches `start`, then exactly one of `succeed` or `fail`. A failure
    /// is both recorded in the store and returned.
    pub async fn list(&self, skip: u32, limit: u32) -> Result<ListOutcome> {
        if limit == 0 {
            return Err(AdminError::EmptyPage);
        }

        let token = self.users.start();
        debug!(?token, skip, limit, "listing users");

        match self.service.list_users(skip, limit).await {
            Ok(page) => {
                let count = page.users.len();
                let total = page.total;
                if self.users.succeed(token, page.users, total) {
                    debug!(count, total, "user list updated");
                    Ok(ListOutcome::Applied)
                } else {
                    Ok(ListOutcome::Superseded)
                }
            }
            Err(e) => {
                warn!(error = %e, skip, limit, "failed to list users");
                self.users.fail(token, e.message());
                Err(e)
            }
        }
    }

    /// Creates a user. The user store is left untouched.
    pub async fn add(&self, user: &NewUser) -> Result<Mutation<CreatedUser>> {
        match self.service.add_user(user).await {
            Ok(created) => {
                info!(id = ?created.id, email = %user.email, "user created");
                Ok(Mutation::new(created))
            }
            Err(e) => {
                warn!(error = %e, email = %user.email, "failed to create user");
                Err(e)
            }
        }
    }

    /// Merges `patch` onto the selected user and replaces that record.
    ///
    /// Fails with [`AdminError::NoSelection`] before any request when nothing
    /// is selected. The selection is left for the caller to clear.
    pub async fn update(&self, patch: &UserPatch) -> Result<Mutation<User>> {
        let selected = self.selection.selected().ok_or(AdminError::NoSelection)?;
        let merged = patch.apply_to(&selected);

        match self.service.replace_user(&merged).await {
            Ok(()) => {
                info!(id = merged.id, "user updated");
                Ok(Mutation::new(merged))
            }
            Err(e) => {
                warn!(error = %e, id = merged.id, "failed to update user");
                Err(e)
            }
        }
    }

    /// Deletes a user by id. The id is not checked against the snapshot.
    pub async fn delete(&self, id: u64) -> Result<Mutation<u64>> {
        match self.service.delete_user(id).await {
            Ok(()) => {
                info!(id, "user deleted");
                Ok(Mutation::new(id))
            }
            Err(e) => {
                warn!(error = %e, id, "failed to delete user");
                Err(e)
            }
        }
    }

    pub fn select(&self, user: User) {
        self.selection.select(user);
    }

    /// Reads one record without touching either store.
    pub async fn fetch(&self, id: u64) -> Result<User> {
        self.service.get_user(id).await
    }

    /// Reads one record from the service and selects it.
    pub async fn select_remote(&self, id: u64) -> Result<User> {
        let user = self.fetch(id).await?;
        self.selection.select(user.clone());
        Ok(user)
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }
}
