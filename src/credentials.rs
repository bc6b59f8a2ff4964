use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::models::{CredentialState, UserRecord};

/// Slot holding the opaque session token.
pub const TOKEN_SLOT: &str = "token";
/// Slot holding the serialized user record.
pub const USER_SLOT: &str = "user";

// 1. SlotStorage Contract
/// SlotStorage
///
/// Read interface of the durable key/value storage the login flow writes to.
/// Implementations must be idempotent: two reads with no intervening write
/// return the same value.
pub trait SlotStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
}

// 2. CredentialStore Contract
/// CredentialStore
///
/// What the navigation guard consumes. Both reads are infallible: absent or
/// malformed data comes back as "no token" / the empty user record.
pub trait CredentialStore: Send + Sync {
    fn read_token(&self) -> Option<String>;

    fn read_user(&self) -> UserRecord;

    /// Reads both slots into a fresh snapshot.
    fn snapshot(&self) -> CredentialState {
        CredentialState {
            token: self.read_token(),
            user: self.read_user(),
        }
    }
}

/// SlotCredentials
///
/// Adapts any `SlotStorage` into a `CredentialStore` by reading the `token`
/// and `user` slots.
#[derive(Clone)]
pub struct SlotCredentials<S> {
    storage: S,
}

impl<S: SlotStorage> SlotCredentials<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: SlotStorage> CredentialStore for SlotCredentials<S> {
    fn read_token(&self) -> Option<String> {
        // An empty token is as good as none.
        self.storage
            .get_item(TOKEN_SLOT)
            .filter(|token| !token.is_empty())
    }

    fn read_user(&self) -> UserRecord {
        match self.storage.get_item(USER_SLOT) {
            Some(raw) => UserRecord::from_serialized(&raw),
            None => UserRecord::default(),
        }
    }
}

impl<S: SlotStorage> SlotStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        self.as_ref().get_item(key)
    }
}

/// MemoryStorage
///
/// Thread-safe in-memory slots. Backs tests and the navigation API, and is
/// also what the login/logout flows write through.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_string(), value.into());
    }

    pub fn remove_item(&self, key: &str) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.remove(key);
    }

    /// store_session
    ///
    /// Login flow write: replaces both slots under one lock so readers never
    /// observe a token paired with the previous user.
    pub fn store_session(&self, token: &str, user: &UserRecord) {
        let serialized = serde_json::to_string(user).unwrap_or_else(|_| "{}".to_string());
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.insert(TOKEN_SLOT.to_string(), token.to_string());
        slots.insert(USER_SLOT.to_string(), serialized);
    }

    /// clear_session
    ///
    /// Logout flow write: removes both slots together.
    pub fn clear_session(&self) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        slots.remove(TOKEN_SLOT);
        slots.remove(USER_SLOT);
    }
}

impl SlotStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.get(key).cloned()
    }
}

/// CookieStorage
///
/// Slots carried by an HTTP `Cookie` header. Used by the HTTP shell, where
/// every request brings its own credential snapshot. Values are
/// percent-decoded and stripped of surrounding quotes.
#[derive(Clone, Default, Debug)]
pub struct CookieStorage {
    jar: CookieJar,
}

impl CookieStorage {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let jar = headers
            .get_all(header::COOKIE)
            .iter()
            // Non-UTF-8 bytes are replaced; the rest of the header still parses.
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .flat_map(|raw| {
                raw.split(';')
                    .filter_map(|pair| Cookie::parse_encoded(pair.trim().to_owned()).ok())
                    .collect::<Vec<_>>()
            })
            .fold(CookieJar::new(), |jar, cookie| jar.add(cookie));

        Self { jar }
    }
}

impl SlotStorage for CookieStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.jar
            .get(key)
            .map(|cookie| cookie.value_trimmed().to_string())
    }
}

/// CredentialReaderState
///
/// The shared, type-erased credential reader injected into the guard.
pub type CredentialReaderState = Arc<dyn CredentialStore>;
