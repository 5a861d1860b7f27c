//! Mock browser surfaces.

use crate::error::{AuthError, Result};
use crate::providers::{AuthCookie, CookieJar, KeyValueStorage, LoginPrompt, Navigator};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
    read_only: Arc<AtomicBool>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value (for assertions).
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    /// Store a raw value, bypassing validation (for seeding corrupt data).
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    /// Make every subsequent write fail.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.get_raw(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(AuthError::StorageUnavailable("quota exceeded".to_string()));
        }
        self.items
            .lock()
            .map_err(|_| AuthError::StorageUnavailable("Mutex lock failed".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

/// Cookie jar remembering the last cookie written per name.
#[derive(Debug, Clone, Default)]
pub struct RecordingCookieJar {
    cookies: Arc<Mutex<HashMap<String, AuthCookie>>>,
}

impl RecordingCookieJar {
    /// Create an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cookie written under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AuthCookie> {
        self.cookies.lock().ok()?.get(name).cloned()
    }
}

impl CookieJar for RecordingCookieJar {
    fn set_cookie(&self, cookie: AuthCookie) {
        if let Ok(mut cookies) = self.cookies.lock() {
            cookies.insert(cookie.name.clone(), cookie);
        }
    }
}

/// Login prompt counting how often it was shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingLoginPrompt {
    shown: Arc<AtomicUsize>,
    visible: Arc<AtomicBool>,
}

impl RecordingLoginPrompt {
    /// Create a hidden prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `show` was called.
    #[must_use]
    pub fn show_count(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    /// Whether the prompt is currently visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl LoginPrompt for RecordingLoginPrompt {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
        self.visible.store(true, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }
}

/// Navigator recording redirects instead of leaving the page.
#[derive(Debug, Clone)]
pub struct RecordingNavigator {
    current: Arc<Mutex<String>>,
    redirects: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    /// Create a navigator sitting on `current_url`.
    #[must_use]
    pub fn new(current_url: impl Into<String>) -> Self {
        Self {
            current: Arc::new(Mutex::new(current_url.into())),
            redirects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every redirect, in order.
    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .map(|redirects| redirects.clone())
            .unwrap_or_default()
    }

    /// The most recent redirect.
    #[must_use]
    pub fn last_redirect(&self) -> Option<String> {
        self.redirects().pop()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::new("http://localhost/")
    }
}

impl Navigator for RecordingNavigator {
    fn current_url(&self) -> String {
        self.current
            .lock()
            .map(|current| current.clone())
            .unwrap_or_default()
    }

    fn redirect(&self, url: &str) {
        if let Ok(mut redirects) = self.redirects.lock() {
            redirects.push(url.to_string());
        }
        if let Ok(mut current) = self.current.lock() {
            *current = url.to_string();
        }
    }
}
