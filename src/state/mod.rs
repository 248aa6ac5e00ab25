//! Runtime state: the session aggregate, its transitions and views, and the
//! shared state handed to the store node routes.

pub mod machine;
pub mod session;
pub mod views;

use std::sync::Arc;

use crate::dao::session_store::{SessionStore, memory::MemorySessionStore};

pub use self::machine::{Phase, TransitionError};
pub use self::session::Session;

pub type SharedState = Arc<AppState>;

/// Central application state of a store node: the installed session store.
pub struct AppState {
    store: Arc<dyn SessionStore>,
}

impl AppState {
    /// Construct a node state backed by the in-process store, wrapped in an
    /// [`Arc`] so it can be cloned cheaply.
    pub fn new() -> SharedState {
        Self::with_store(Arc::new(MemorySessionStore::new()))
    }

    /// Construct a node state over an explicit store implementation.
    pub fn with_store(store: Arc<dyn SessionStore>) -> SharedState {
        Arc::new(Self { store })
    }

    /// Handle to the installed session store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}
