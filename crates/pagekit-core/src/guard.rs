//! # Re-entrancy guard
//!
//! A [`GuardRegistry`] keeps a set of busy keys. Only one operation may be in
//! flight per key; a second `run_once` under a busy key is dropped without
//! running.
//!
//! ```rust
//! use pagekit_core::GuardRegistry;
//!
//! let guards = GuardRegistry::new();
//! let mut held = None;
//! assert!(guards.run_once("save", |h| held = Some(h)));
//! assert!(!guards.run_once("save", |_| unreachable!()));
//!
//! drop(held); // releases "save"
//! assert!(guards.run_once("save", |_| {}));
//! ```
//!
//! The key is released when the [`GuardHandle`] is released or dropped, or
//! when [`GuardRegistry::release`] is called. There is no timeout: a handle
//! that is kept forever (or leaked with `mem::forget`) blocks its key for the
//! lifetime of the registry. That is the caller's responsibility.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};

#[derive(Default)]
struct GuardState {
    // key -> generation of the acquisition currently holding it
    busy: HashMap<String, u64>,
    next_generation: u64,
}

#[derive(Clone, Default)]
pub struct GuardRegistry {
    inner: Rc<RefCell<GuardState>>,
}

impl GuardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` busy and returns a handle, or `None` if it already is.
    pub fn try_acquire(&self, key: impl Into<String>) -> Option<GuardHandle> {
        let key = key.into();
        let mut s = self.inner.borrow_mut();
        if s.busy.contains_key(&key) {
            log::debug!("guard '{key}' busy; dropping call");
            return None;
        }
        let generation = s.next_generation;
        s.next_generation += 1;
        s.busy.insert(key.clone(), generation);
        log::debug!("guard '{key}' acquired");
        Some(GuardHandle {
            key,
            generation,
            registry: Some(Rc::downgrade(&self.inner)),
        })
    }

    /// Runs `op` unless `key` is busy. Returns whether `op` ran.
    ///
    /// `op` owns the handle; the key stays busy until the handle is released
    /// or dropped, which may happen long after `op` returns.
    pub fn run_once(&self, key: impl Into<String>, op: impl FnOnce(GuardHandle)) -> bool {
        match self.try_acquire(key) {
            Some(handle) => {
                op(handle);
                true
            }
            None => false,
        }
    }

    /// Async flavour of [`run_once`](Self::run_once).
    ///
    /// `op` is started immediately; the key is released when the returned
    /// future completes or is dropped. Returns `None` if `key` is busy.
    pub fn run_once_async<F, Fut>(
        &self,
        key: impl Into<String>,
        op: F,
    ) -> Option<impl Future<Output = Fut::Output>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future,
    {
        let handle = self.try_acquire(key)?;
        let fut = op(handle.key().to_owned());
        Some(async move {
            let out = fut.await;
            handle.release();
            out
        })
    }

    /// Frees `key`. Calling it for a key that is not busy does nothing.
    pub fn release(&self, key: &str) {
        if self.inner.borrow_mut().busy.remove(key).is_some() {
            log::debug!("guard '{key}' released");
        }
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.inner.borrow().busy.contains_key(key)
    }

    pub fn busy_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.borrow().busy.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Proof that a key is held. Releases the key at most once, on
/// [`release`](Self::release) or drop.
///
/// A handle only frees the acquisition it was created for: if its key was
/// released through the registry and acquired again, the stale handle leaves
/// the new holder alone.
pub struct GuardHandle {
    key: String,
    generation: u64,
    registry: Option<Weak<RefCell<GuardState>>>,
}

impl GuardHandle {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        let Some(state) = self.registry.take().and_then(|w| w.upgrade()) else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.busy.get(&self.key) == Some(&self.generation) {
            s.busy.remove(&self.key);
            log::debug!("guard '{}' released", self.key);
        }
    }
}

impl Drop for GuardHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for GuardHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardHandle")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .finish()
    }
}
