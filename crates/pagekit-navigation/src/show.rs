//! One-shot "run when this page is shown again" callbacks.
//!
//! The first registration on a page wraps its visibility handler in a
//! dispatcher; later registrations only queue. On each show the dispatcher
//! runs the previous handler, then takes every callback pending for that
//! page and fires them in registration order, each exactly once. Callbacks
//! registered while dispatching wait for the next show.
//!
//! Replacing the page's handler after a hook was registered also removes
//! the dispatcher; pending hooks then stay pending until cancelled.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use pagekit_core::{Error, Result};
use slotmap::SlotMap;

use crate::{Host, Page};

slotmap::new_key_type! {
    pub struct ShowHandle;
}

/// Attachment key under which a page records its newest show handle.
pub const LAST_SHOW_HANDLE: &str = "pagekit:show";

/// Attachment key listing the hook registries dispatching on a page.
const DISPATCHERS: &str = "pagekit:show-dispatchers";

struct PendingShow {
    page_id: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ShowState {
    pending: SlotMap<ShowHandle, PendingShow>,
    // page id -> handles in registration order
    by_page: HashMap<u64, Vec<ShowHandle>>,
}

impl ShowState {
    fn remove(&mut self, handle: ShowHandle) -> Option<PendingShow> {
        let p = self.pending.remove(handle)?;
        if let Some(queue) = self.by_page.get_mut(&p.page_id) {
            queue.retain(|h| *h != handle);
            if queue.is_empty() {
                self.by_page.remove(&p.page_id);
            }
        }
        Some(p)
    }

    fn take_page(&mut self, page_id: u64) -> Vec<Box<dyn FnOnce()>> {
        let handles = self.by_page.remove(&page_id).unwrap_or_default();
        handles
            .into_iter()
            .filter_map(|h| self.pending.remove(h))
            .map(|p| p.callback)
            .collect()
    }
}

type Shared = RefCell<ShowState>;

#[derive(Clone, Default)]
pub struct ShowHooks {
    inner: Rc<Shared>,
}

impl ShowHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_next_show<H: Host + ?Sized>(
        &self,
        host: &H,
        callback: impl FnOnce() + 'static,
    ) -> Result<ShowHandle> {
        self.register(host, Box::new(callback))
    }

    /// Like [`on_next_show`](Self::on_next_show), then runs
    /// `before_navigate` (usually the navigation that hides the page).
    pub fn on_next_show_with<H: Host + ?Sized>(
        &self,
        host: &H,
        callback: impl FnOnce() + 'static,
        before_navigate: impl FnOnce(),
    ) -> Result<ShowHandle> {
        let handle = self.register(host, Box::new(callback))?;
        before_navigate();
        Ok(handle)
    }

    /// Deregisters a pending callback. Returns whether it was still pending.
    pub fn cancel(&self, handle: ShowHandle) -> bool {
        // dropped outside the borrow
        let removed = self.inner.borrow_mut().remove(handle);
        removed.is_some()
    }

    pub fn is_pending(&self, handle: ShowHandle) -> bool {
        self.inner.borrow().pending.contains_key(handle)
    }

    /// Number of callbacks still waiting on page `page_id`.
    pub fn pending_for(&self, page_id: u64) -> usize {
        self.inner
            .borrow()
            .by_page
            .get(&page_id)
            .map_or(0, Vec::len)
    }

    fn register<H: Host + ?Sized>(
        &self,
        host: &H,
        callback: Box<dyn FnOnce()>,
    ) -> Result<ShowHandle> {
        let page = host.top_page().ok_or(Error::NoActivePage)?;
        let handle = {
            let mut s = self.inner.borrow_mut();
            let handle = s.pending.insert(PendingShow {
                page_id: page.id(),
                callback,
            });
            s.by_page.entry(page.id()).or_default().push(handle);
            handle
        };
        self.install_dispatcher(&page);
        page.attach(LAST_SHOW_HANDLE, handle);

        log::debug!("show hook {handle:?} on page {} ({})", page.id(), page.route());
        Ok(handle)
    }

    fn install_dispatcher(&self, page: &Page) {
        let me: Weak<Shared> = Rc::downgrade(&self.inner);
        let mut installed: Vec<Weak<Shared>> = page.attachment(DISPATCHERS).unwrap_or_default();
        if installed.iter().any(|w| w.ptr_eq(&me)) {
            return;
        }

        let prev = page.take_on_show();
        let page_id = page.id();
        let hooks = me.clone();
        page.set_on_show(Some(Rc::new(move || {
            if let Some(prev) = &prev {
                prev();
            }
            let Some(hooks) = hooks.upgrade() else {
                return;
            };
            let due = hooks.borrow_mut().take_page(page_id);
            for callback in due {
                callback();
            }
        })));

        installed.retain(|w| w.strong_count() > 0);
        installed.push(me);
        page.attach(DISPATCHERS, installed);
    }
}
