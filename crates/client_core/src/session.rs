//! Read-only access to the browser-style key/value session storage.

use std::{collections::HashMap, fs, path::Path};

use shared::domain::{SessionUser, UserType};

use crate::error::SessionError;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "jwt";

pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Signed-in user, stored as JSON under the `user` key.
    fn current_user(&self) -> Result<SessionUser, SessionError> {
        let raw = self.get_item(USER_KEY).ok_or(SessionError::NoUser)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn token(&self) -> Option<String> {
        self.get_item(TOKEN_KEY)
    }
}

/// Returns the signed-in user, failing unless they are an employee.
pub fn require_employee(store: &dyn SessionStore) -> Result<SessionUser, SessionError> {
    let user = store.current_user()?;
    if user.user_type != UserType::Employee {
        return Err(SessionError::NotEmployee { email: user.email });
    }
    Ok(user)
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    items: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employee(email: &str) -> Self {
        let user = SessionUser {
            user_type: UserType::Employee,
            email: email.to_string(),
        };
        // Serializing a plain struct of strings cannot fail.
        let raw = serde_json::to_string(&user).unwrap_or_default();
        Self::new().with_item(USER_KEY, raw)
    }

    pub fn with_item(mut self, key: &str, value: impl Into<String>) -> Self {
        self.items.insert(key.to_string(), value.into());
        self
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }
}

/// Session storage persisted as a flat JSON object of string values.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    items: HashMap<String, String>,
}

impl FileSessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let items = serde_json::from_str(&raw)?;
        Ok(Self { items })
    }
}

impl SessionStore for FileSessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }
}
