use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::channel::EventChannel;

pub type ShowFn = Rc<dyn Fn()>;

struct PageInner {
    id: u64,
    route: String,
    query: String,
    on_show: RefCell<Option<ShowFn>>,
    opener: Option<EventChannel>,
    attachments: RefCell<HashMap<&'static str, Box<dyn Any>>>,
}

/// Handle to a live page instance. Clones share the same page.
#[derive(Clone)]
pub struct Page(Rc<PageInner>);

impl Page {
    pub fn new(id: u64, url: &str, opener: Option<EventChannel>) -> Self {
        let (route, query) = match url.split_once('?') {
            Some((r, q)) => (r, q),
            None => (url, ""),
        };
        Self(Rc::new(PageInner {
            id,
            route: route.to_string(),
            query: query.to_string(),
            on_show: RefCell::new(None),
            opener,
            attachments: RefCell::new(HashMap::new()),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn route(&self) -> &str {
        &self.0.route
    }

    /// Raw query string of the url the page was opened with.
    pub fn query(&self) -> &str {
        &self.0.query
    }

    /// Channel back to the page that navigated here, if it used `navigate`.
    pub fn opener_event_channel(&self) -> Option<EventChannel> {
        self.0.opener.clone()
    }

    pub fn set_on_show(&self, handler: Option<ShowFn>) {
        *self.0.on_show.borrow_mut() = handler;
    }

    pub fn take_on_show(&self) -> Option<ShowFn> {
        self.0.on_show.borrow_mut().take()
    }

    /// Runs the visibility handler. The handler may replace itself.
    pub fn show(&self) {
        let handler = self.0.on_show.borrow().clone();
        if let Some(h) = handler {
            h();
        }
    }

    pub fn attach<T: 'static>(&self, key: &'static str, value: T) {
        self.0.attachments.borrow_mut().insert(key, Box::new(value));
    }

    pub fn attachment<T: 'static + Clone>(&self, key: &'static str) -> Option<T> {
        self.0
            .attachments
            .borrow()
            .get(key)
            .and_then(|b| b.downcast_ref::<T>())
            .cloned()
    }

    pub fn ptr_eq(&self, other: &Page) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.0.id)
            .field("route", &self.0.route)
            .finish()
    }
}
