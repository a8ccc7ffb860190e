//! # Key/value store with bounded watchers
//!
//! [`Store`] maps string keys to `serde_json::Value`s. A watch registers a
//! callback that fires on the next write(s) to a key and then detaches:
//!
//! ```rust
//! use pagekit_core::Store;
//! use std::{cell::Cell, rc::Rc};
//!
//! let store = Store::new();
//! let hits = Rc::new(Cell::new(0));
//! let h = hits.clone();
//! store.watch("score", move |_, _| h.set(h.get() + 1));
//!
//! store.write("score", 10);
//! store.write("score", 20);
//! assert_eq!(hits.get(), 1);
//! assert_eq!(store.read("score"), Some(serde_json::json!(20)));
//! ```
//!
//! Several watches on one key accumulate. Each write consumes one fire from
//! the oldest pending registration, so two `watch` calls followed by two
//! writes give one callback per write, in registration order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;
use crate::watch::{WatchHandle, WatchSlots};

struct StoreState {
    values: HashMap<String, Value>,
    watches: WatchSlots,
    default_fires: u32,
}

#[derive(Clone)]
pub struct Store {
    inner: Rc<RefCell<StoreState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_default_fires(1)
    }

    /// Store whose plain [`watch`](Self::watch) grants `fires` callbacks.
    pub fn with_default_fires(fires: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreState {
                values: HashMap::new(),
                watches: WatchSlots::default(),
                default_fires: fires.max(1),
            })),
        }
    }

    /// Upserts `value` and notifies at most one pending watcher.
    pub fn write(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let fire = {
            let mut s = self.inner.borrow_mut();
            s.values.insert(key.clone(), value.clone());
            s.watches.take_fire(&key)
        };
        // borrow released: the callback may touch the store again
        if let Some(cb) = fire {
            cb(&key, &value);
        }
    }

    pub fn read(&self, key: &str) -> Option<Value> {
        self.inner.borrow().values.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().values.contains_key(key)
    }

    pub fn write_as<T: Serialize>(&self, key: impl Into<String>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.write(key, value);
        Ok(())
    }

    /// `Ok(None)` when the key was never written.
    pub fn read_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read(key) {
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
            None => Ok(None),
        }
    }

    pub fn watch(
        &self,
        key: impl Into<String>,
        callback: impl Fn(&str, &Value) + 'static,
    ) -> WatchHandle {
        let fires = self.inner.borrow().default_fires;
        self.watch_n(key, fires, callback)
    }

    /// Watches `key` for the next `fires` writes that reach this
    /// registration. `fires == 0` registers nothing.
    pub fn watch_n(
        &self,
        key: impl Into<String>,
        fires: u32,
        callback: impl Fn(&str, &Value) + 'static,
    ) -> WatchHandle {
        let key = key.into();
        log::debug!("watch '{key}' for {fires} write(s)");
        self.inner
            .borrow_mut()
            .watches
            .add(key, fires, Rc::new(callback))
    }

    /// Drops a pending registration. Returns `false` if it already fired
    /// out or was never registered.
    pub fn unwatch(&self, handle: WatchHandle) -> bool {
        self.inner.borrow_mut().watches.remove(handle)
    }

    /// Callbacks still owed for `key`.
    pub fn pending_fires(&self, key: &str) -> u32 {
        self.inner.borrow().watches.pending(key)
    }

    /// How many keys currently have a pending watch.
    pub fn watched_keys(&self) -> usize {
        self.inner.borrow().watches.watched_keys()
    }
}
