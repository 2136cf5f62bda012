//! Keyed input store
//!
//! One [`InputStore`] backs one procedure form session. It maps the dotted
//! path of every mounted leaf to an [`InputEntry`], notifies listeners
//! synchronously after each mutation, and refuses all access once closed.
//!
//! Mutations take `&mut self`, so a listener can never call back into the
//! store it observes.
//!
//! # Example
//! ```rust,ignore
//! use rpc_board::{InputStore, InputValue};
//!
//! let mut store = InputStore::new();
//! store.subscribe(|state| println!("{} entries", state.len()))?;
//! store.set_input("root.name", InputValue::from("Ada"))?;
//! store.delete_input("root.name")?;
//! store.close()?;
//! ```

use crate::error::{BoardError, BoardResult};
use crate::value::InputValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A unique, time-ordered form session identifier based on UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new session ID using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ses_{}", self.0)
    }
}

/// Handle returned by [`InputStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// One stored leaf value. `key` is always the path it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEntry {
    pub key: String,
    pub value: InputValue,
}

/// Full store contents, in insertion order.
pub type StoreState = IndexMap<String, InputEntry>;

type Listener = Box<dyn FnMut(&StoreState)>;

/// Per-session map from dotted path to input entry.
pub struct InputStore {
    session: SessionId,
    entries: StoreState,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    closed: bool,
}

impl fmt::Debug for InputStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputStore")
            .field("session", &self.session)
            .field("entries", &self.entries)
            .field("listeners", &self.listeners.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Default for InputStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InputStore {
    /// Open a store for a fresh session.
    pub fn new() -> Self {
        let session = SessionId::new();
        tracing::debug!(session = %session, "input store opened");
        Self {
            session,
            entries: IndexMap::new(),
            listeners: Vec::new(),
            next_listener: 0,
            closed: false,
        }
    }

    /// The session this store belongs to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self, operation: &str) -> BoardResult<()> {
        if self.closed {
            return Err(BoardError::store_misuse(format!(
                "{} on closed session {}",
                operation, self.session
            )));
        }
        Ok(())
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.entries);
        }
    }

    /// Store `value` under `path`, replacing any previous entry.
    pub fn set_input(&mut self, path: impl Into<String>, value: InputValue) -> BoardResult<()> {
        self.ensure_open("set_input")?;
        let key = path.into();
        tracing::trace!(session = %self.session, path = %key, value = %value, "set input");
        self.entries.insert(key.clone(), InputEntry { key, value });
        self.notify();
        Ok(())
    }

    /// Remove the entry under `path`, if any. Listeners run either way.
    pub fn delete_input(&mut self, path: &str) -> BoardResult<Option<InputEntry>> {
        self.ensure_open("delete_input")?;
        tracing::trace!(session = %self.session, path = %path, "delete input");
        let removed = self.entries.shift_remove(path);
        self.notify();
        Ok(removed)
    }

    /// Register a listener called with the full state after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> BoardResult<ListenerId>
    where
        F: FnMut(&StoreState) + 'static,
    {
        self.ensure_open("subscribe")?;
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        Ok(id)
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> BoardResult<bool> {
        self.ensure_open("unsubscribe")?;
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        Ok(self.listeners.len() != before)
    }

    /// Current contents.
    pub fn state(&self) -> BoardResult<&StoreState> {
        self.ensure_open("state")?;
        Ok(&self.entries)
    }

    /// The value stored under `path`.
    pub fn get(&self, path: &str) -> BoardResult<Option<&InputValue>> {
        self.ensure_open("get")?;
        Ok(self.entries.get(path).map(|entry| &entry.value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key, one `key:json` line each.
    pub fn snapshot_lines(&self) -> BoardResult<Vec<String>> {
        self.ensure_open("snapshot_lines")?;
        let mut entries: Vec<&InputEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries
            .into_iter()
            .map(|entry| format!("{}:{}", entry.key, entry.value))
            .collect())
    }

    /// End the session and drop all listeners.
    ///
    /// Entries still present are orphans of an incomplete unmount; they are
    /// cleared and reported as `STORE_MISUSE`.
    pub fn close(&mut self) -> BoardResult<()> {
        self.ensure_open("close")?;
        self.closed = true;
        self.listeners.clear();
        let orphaned = self.entries.len();
        self.entries.clear();
        if orphaned > 0 {
            tracing::warn!(session = %self.session, orphaned, "input store closed with entries");
            return Err(BoardError::store_misuse(format!(
                "session {} closed with {} orphaned entries",
                self.session, orphaned
            )));
        }
        tracing::debug!(session = %self.session, "input store closed");
        Ok(())
    }
}
