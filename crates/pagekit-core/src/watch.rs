use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to one pending watch registration.
    pub struct WatchHandle;
}

pub type WatchFn = Rc<dyn Fn(&str, &Value)>;

struct Registration {
    key: String,
    remaining: u32,
    callback: WatchFn,
}

/// Per-key queues of bounded watch registrations.
///
/// A key's counter is the sum of `remaining` over its queue. Every write
/// consumes one fire from the front registration; registrations leave the
/// queue when they run out.
#[derive(Default)]
pub(crate) struct WatchSlots {
    registrations: SlotMap<WatchHandle, Registration>,
    queues: HashMap<String, VecDeque<WatchHandle>>,
}

impl WatchSlots {
    pub(crate) fn add(&mut self, key: String, fires: u32, callback: WatchFn) -> WatchHandle {
        if fires == 0 {
            return WatchHandle::default();
        }
        let handle = self.registrations.insert(Registration {
            key: key.clone(),
            remaining: fires,
            callback,
        });
        self.queues.entry(key).or_default().push_back(handle);
        handle
    }

    pub(crate) fn remove(&mut self, handle: WatchHandle) -> bool {
        let Some(reg) = self.registrations.remove(handle) else {
            return false;
        };
        if let Some(queue) = self.queues.get_mut(&reg.key) {
            queue.retain(|h| *h != handle);
            if queue.is_empty() {
                self.queues.remove(&reg.key);
            }
        }
        true
    }

    /// Consumes one fire for `key` and returns the callback to invoke, if any.
    ///
    /// Decrements before returning, so the write that exhausts the last
    /// registration still gets its callback.
    pub(crate) fn take_fire(&mut self, key: &str) -> Option<WatchFn> {
        let queue = self.queues.get_mut(key)?;
        let &front = queue.front()?;
        let reg = self.registrations.get_mut(front)?;
        reg.remaining -= 1;
        let callback = reg.callback.clone();
        if reg.remaining == 0 {
            queue.pop_front();
            self.registrations.remove(front);
            if queue.is_empty() {
                self.queues.remove(key);
                log::debug!("watch '{key}' exhausted; slot dormant");
            }
        }
        Some(callback)
    }

    /// Keys with at least one pending registration.
    pub(crate) fn watched_keys(&self) -> usize {
        self.queues.len()
    }

    pub(crate) fn pending(&self, key: &str) -> u32 {
        self.queues
            .get(key)
            .map(|q| {
                q.iter()
                    .filter_map(|h| self.registrations.get(*h))
                    .map(|r| r.remaining)
                    .sum()
            })
            .unwrap_or(0)
    }
}
