//! The hard-coded login gate and the key-value file that remembers it.
//!
//! Not a security boundary: the credentials are a fixed demo pair and are
//! stored in plain text, like the browser local storage they stand in for.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AdminError, Result};

const DEMO_USERNAME: &str = "hamid";
const DEMO_PASSWORD: &str = "123456";
const MIN_PASSWORD_LEN: usize = 6;

pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
pub const REMEMBERED_AT_KEY: &str = "remembered_at";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl KeyValueStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        HashMap::remove(self, key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change.
#[derive(Serialize, Deserialize, Default)]
pub struct FileStore {
    #[serde(skip)]
    path: PathBuf,
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens `session.json` next to the config file.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        Config::config_path().map(|p| p.with_file_name("session.json"))
    }

    pub fn open(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| AdminError::SessionRead {
            path: path.clone(),
            source: e,
        })?;

        let mut store: Self =
            serde_json::from_str(&contents).map_err(|e| AdminError::SessionParse {
                path: path.clone(),
                source: e,
            })?;
        store.path = path;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let write_err = |e| AdminError::SessionWrite {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(std::io::Error::from)
            .map_err(write_err)?;
        std::fs::write(&self.path, contents).map_err(write_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// A remembered login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub username: String,
    pub remembered_at: Option<DateTime<Utc>>,
}

/// Field rules of the login form.
pub fn validate_login(username: &str, password: &str) -> Vec<String> {
    let mut messages = Vec::new();
    if username.trim().is_empty() {
        messages.push("Username is required".to_string());
    }
    if password.is_empty() {
        messages.push("Password is required".to_string());
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        messages.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    messages
}

fn credentials_match(username: &str, password: &str) -> bool {
    username == DEMO_USERNAME && password == DEMO_PASSWORD
}

/// Checks the pair and remembers it on success.
pub fn login<K: KeyValueStore>(store: &mut K, username: &str, password: &str) -> Result<Session> {
    let messages = validate_login(username, password);
    if !messages.is_empty() {
        return Err(AdminError::InvalidForm { messages });
    }
    if !credentials_match(username, password) {
        debug!(username, "rejected login");
        return Err(AdminError::InvalidCredentials);
    }

    let now = Utc::now();
    store.set(USERNAME_KEY, username.to_string())?;
    store.set(PASSWORD_KEY, password.to_string())?;
    store.set(REMEMBERED_AT_KEY, now.to_rfc3339())?;
    debug!(username, "login remembered");

    Ok(Session {
        username: username.to_string(),
        remembered_at: Some(now),
    })
}

/// The remembered pair, if any, for pre-filling the login prompt.
pub fn remembered<K: KeyValueStore>(store: &K) -> Option<(String, String)> {
    Some((store.get(USERNAME_KEY)?, store.get(PASSWORD_KEY)?))
}

/// The current session, when the remembered pair still passes the check.
pub fn current<K: KeyValueStore>(store: &K) -> Option<Session> {
    let (username, password) = remembered(store)?;
    if !credentials_match(&username, &password) {
        return None;
    }
    let remembered_at = store
        .get(REMEMBERED_AT_KEY)
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    Some(Session {
        username,
        remembered_at,
    })
}

pub fn require_login<K: KeyValueStore>(store: &K) -> Result<Session> {
    current(store).ok_or(AdminError::NotLoggedIn)
}

pub fn logout<K: KeyValueStore>(store: &mut K) -> Result<()> {
    store.remove(USERNAME_KEY)?;
    store.remove(PASSWORD_KEY)?;
    store.remove(REMEMBERED_AT_KEY)
}
