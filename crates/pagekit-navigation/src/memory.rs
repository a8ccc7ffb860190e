//! In-memory [`Host`]: a page back stack with mini-program navigation
//! semantics. Useful for tests and for running page logic off-device.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use pagekit_core::{Notice, NoticeSink};

use crate::{EventChannel, Host, NavigateError, Page};

/// Deepest the page stack may grow through `navigate`.
pub const MAX_STACK_DEPTH: usize = 10;

struct BackState {
    pages: Vec<Page>,
    next_id: u64,
    // None accepts every route
    routes: Option<HashSet<String>>,
    notices: Vec<Notice>,
}

#[derive(Clone)]
pub struct MemoryHost {
    inner: Rc<RefCell<BackState>>,
}

impl MemoryHost {
    pub fn new(start: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BackState {
                pages: vec![Page::new(1, start, None)],
                next_id: 2,
                routes: None,
                notices: Vec::new(),
            })),
        }
    }

    /// Host that only knows `routes`; navigating anywhere else fails.
    pub fn with_routes<I, S>(start: &str, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let host = Self::new(start);
        host.inner.borrow_mut().routes = Some(routes.into_iter().map(Into::into).collect());
        host
    }

    pub fn top(&self) -> Option<Page> {
        self.inner.borrow().pages.last().cloned()
    }

    pub fn size(&self) -> usize {
        self.inner.borrow().pages.len()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.inner.borrow().notices.clone()
    }

    fn check_route(&self, url: &str) -> Result<(), NavigateError> {
        let route = url.split_once('?').map_or(url, |(r, _)| r);
        match &self.inner.borrow().routes {
            Some(known) if !known.contains(route) => {
                Err(NavigateError::new(format!("page \"{route}\" is not found")))
            }
            _ => Ok(()),
        }
    }

    fn new_page(&self, url: &str, opener: Option<EventChannel>) -> Page {
        let mut s = self.inner.borrow_mut();
        let id = s.next_id;
        s.next_id += 1;
        Page::new(id, url, opener)
    }

    /// Pops the top page and shows the one beneath. The last page is never
    /// popped.
    pub fn navigate_back(&self) -> bool {
        let revealed = {
            let mut s = self.inner.borrow_mut();
            if s.pages.len() <= 1 {
                return false;
            }
            s.pages.pop();
            s.pages.last().cloned()
        };
        if let Some(page) = revealed {
            page.show();
        }
        true
    }

    /// Replaces the top page; nothing beneath it is shown.
    pub fn redirect(&self, url: &str) -> Result<(), NavigateError> {
        self.check_route(url)?;
        let page = self.new_page(url, None);
        {
            let mut s = self.inner.borrow_mut();
            s.pages.pop();
            s.pages.push(page.clone());
        }
        page.show();
        Ok(())
    }

    /// Clears the stack and opens `url` as its only page.
    pub fn relaunch(&self, url: &str) -> Result<(), NavigateError> {
        self.check_route(url)?;
        let page = self.new_page(url, None);
        {
            let mut s = self.inner.borrow_mut();
            s.pages.clear();
            s.pages.push(page.clone());
        }
        page.show();
        Ok(())
    }
}

impl NoticeSink for MemoryHost {
    fn show_modal(&self, notice: &Notice) {
        log::warn!("modal: {notice}");
        self.inner.borrow_mut().notices.push(notice.clone());
    }
}

impl Host for MemoryHost {
    fn current_pages(&self) -> Vec<Page> {
        self.inner.borrow().pages.clone()
    }

    fn navigate(&self, url: &str) -> Result<EventChannel, NavigateError> {
        self.check_route(url)?;
        if self.size() >= MAX_STACK_DEPTH {
            return Err(NavigateError::new("page stack limit exceeded"));
        }
        let (opener, target) = EventChannel::pair();
        let page = self.new_page(url, Some(target));
        self.inner.borrow_mut().pages.push(page.clone());
        page.show();
        Ok(opener)
    }
}
