use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use pagekit_core::{Notice, NoticeSink};
use serde_json::Value;

pub type Method = Rc<dyn Fn(&[Value]) -> anyhow::Result<Value>>;

/// A value handed over from page code: either something callable or plain
/// data.
#[derive(Clone)]
pub enum HostValue {
    Method(Method),
    Data(Value),
}

impl HostValue {
    pub fn method(f: impl Fn(&[Value]) -> anyhow::Result<Value> + 'static) -> Self {
        HostValue::Method(Rc::new(f))
    }
}

impl From<Value> for HostValue {
    fn from(v: Value) -> Self {
        HostValue::Data(v)
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Method(_) => f.write_str("Method(..)"),
            HostValue::Data(v) => f.debug_tuple("Data").field(v).finish(),
        }
    }
}

/// Named methods shared between pages.
///
/// Misuse is reported to the user through a [`NoticeSink`], never as an
/// error: registering a non-callable value is ignored, looking up an unknown
/// key yields `None`.
pub struct MethodRegistry {
    methods: RefCell<HashMap<String, Method>>,
    notice_title: String,
}

impl MethodRegistry {
    pub fn new(notice_title: impl Into<String>) -> Self {
        Self {
            methods: RefCell::new(HashMap::new()),
            notice_title: notice_title.into(),
        }
    }

    /// Registers `entry` under `key`, replacing any previous method.
    /// Returns whether something was registered.
    pub fn add(&self, sink: &dyn NoticeSink, key: impl Into<String>, entry: HostValue) -> bool {
        match entry {
            HostValue::Method(m) => {
                self.methods.borrow_mut().insert(key.into(), m);
                true
            }
            HostValue::Data(_) => {
                sink.show_modal(&Notice::invalid_argument(
                    self.notice_title.clone(),
                    "method not a function",
                ));
                false
            }
        }
    }

    pub fn get(&self, sink: &dyn NoticeSink, key: &str) -> Option<Method> {
        let found = self.methods.borrow().get(key).cloned();
        if found.is_none() {
            sink.show_modal(&Notice::unregistered_key(self.notice_title.clone(), key));
        }
        found
    }

    pub fn contains(&self, key: &str) -> bool {
        self.methods.borrow().contains_key(key)
    }
}
