//! Service double and fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::client::UserService;
use crate::error::{AdminError, Result};
use crate::store::UserStore;
use crate::types::{CreatedUser, NewUser, User, UserPage};

pub type PageReply = Result<UserPage>;

/// Scripted service double. Counts calls, records bodies, and notes
/// whether the store was loading when each list request went out.
#[derive(Default)]
pub struct FakeService {
    pub calls: AtomicUsize,
    pub pages: Mutex<VecDeque<PageReply>>,
    pub held_pages: Mutex<VecDeque<oneshot::Receiver<PageReply>>>,
    pub observed_store: Mutex<Option<Arc<UserStore>>>,
    pub loading_at_call: Mutex<Vec<bool>>,
    pub listed: Mutex<Vec<(u32, u32)>>,
    pub added: Mutex<Vec<NewUser>>,
    pub replaced: Mutex<Vec<User>>,
    pub deleted: Mutex<Vec<u64>>,
    pub fail_mutations: bool,
}

impl FakeService {
    pub fn with_pages(pages: Vec<PageReply>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn failing_mutations() -> Self {
        Self {
            fail_mutations: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn mutation_result(&self) -> Result<()> {
        if self.fail_mutations {
            Err(AdminError::ApiError {
                status: 500,
                message: "Internal Server Error".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserService for Arc<FakeService> {
    async fn list_users(&self, skip: u32, limit: u32) -> Result<UserPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.listed.lock().unwrap().push((skip, limit));
        let observed = self.observed_store.lock().unwrap().clone();
        if let Some(store) = observed {
            self.loading_at_call
                .lock()
                .unwrap()
                .push(store.snapshot().loading);
        }

        let held = self.held_pages.lock().unwrap().pop_front();
        if let Some(rx) = held {
            return rx.await.unwrap_or_else(|_| Ok(UserPage::default()));
        }
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(UserPage::default()))
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if id == 404 {
            return Err(AdminError::UserNotFound(id));
        }
        Ok(user(id, "Remote"))
    }

    async fn add_user(&self, new_user: &NewUser) -> Result<CreatedUser> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_result()?;
        self.added.lock().unwrap().push(new_user.clone());
        Ok(CreatedUser { id: Some(209) })
    }

    async fn replace_user(&self, user: &User) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_result()?;
        self.replaced.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_result()?;
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

pub fn user(id: u64, first_name: &str) -> User {
    User {
        id,
        first_name: first_name.to_string(),
        last_name: "Leeds".to_string(),
        email: format!("user{id}@example.com"),
        phone: "5551234".to_string(),
        ..User::default()
    }
}

pub fn page(ids: std::ops::Range<u64>, total: u64) -> UserPage {
    UserPage {
        users: ids.map(|id| user(id, "Page")).collect(),
        total,
    }
}

pub fn network_error() -> AdminError {
    AdminError::ApiError {
        status: 0,
        message: "Network Error".to_string(),
    }
}

pub fn new_user() -> NewUser {
    NewUser {
        first_name: "Maria".to_string(),
        last_name: "Garcia".to_string(),
        email: "maria@example.com".to_string(),
        phone: "5551234".to_string(),
    }
}
