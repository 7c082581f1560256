//! Session Token
//!
//! The single process-wide authentication state. Components never touch
//! storage directly; they go through [`Session`].

use std::cell::RefCell;
use std::rc::Rc;

/// Where the bearer token lives between page loads
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// Browser `localStorage` under one key
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl TokenStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(&self.key).ok().flatten()
    }

    fn save(&self, token: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(&self.key, token).is_err() {
                    tracing::warn!("localStorage rejected token write");
                }
            }
            None => tracing::warn!("localStorage unavailable, token not saved"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

/// In-process store (tests, private browsing fallback)
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

type SignedOutHook = Rc<dyn Fn()>;

/// Shared handle over the token store plus the "signed out" notification
#[derive(Clone)]
pub struct Session {
    store: Rc<dyn TokenStore>,
    on_signed_out: Rc<RefCell<Option<SignedOutHook>>>,
}

impl Session {
    pub fn new(store: Rc<dyn TokenStore>) -> Self {
        Self {
            store,
            on_signed_out: Rc::new(RefCell::new(None)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryTokenStore::default()))
    }

    /// Called whenever the token goes away (logout or rejected by the server)
    pub fn set_signed_out_hook(&self, hook: impl Fn() + 'static) {
        *self.on_signed_out.borrow_mut() = Some(Rc::new(hook));
    }

    /// Stored token, if it is not blank
    pub fn token(&self) -> Option<String> {
        self.store.load().filter(|t| !t.trim().is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn login(&self, token: &str) {
        self.store.save(token);
        tracing::info!("session started");
    }

    pub fn logout(&self) {
        self.store.clear();
        tracing::info!("session ended");
        // Clone out so the hook may touch the session again
        let hook = self.on_signed_out.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Server rejected the token
    pub fn expire(&self) {
        tracing::warn!("token rejected by server, signing out");
        self.logout();
    }
}
