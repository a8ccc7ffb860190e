//! # pagekit
//!
//! Small helpers for mini-program pages, bundled behind one [`Toolkit`]:
//!
//! - `on_next_show`: run a callback once when the current page comes back.
//! - `navigate_with_data` / `receive_data`: hand a JSON object to the next
//!   page without url-encoding it.
//! - `run_once`: drop re-entrant calls of a keyed operation until it
//!   releases.
//! - `write` / `read` / `watch`: a value store with bounded change watchers.
//! - `add_method` / `run_method`: named methods shared between pages.
//!
//! ```rust
//! use pagekit::*;
//!
//! let kit = Toolkit::new(MemoryHost::new("pages/index"));
//!
//! let mut saving = None;
//! assert!(kit.run_once("save", |guard| saving = Some(guard)));
//! assert!(!kit.run_once("save", |_| unreachable!()));
//! drop(saving);
//! assert!(kit.run_once("save", |_| {}));
//! ```

pub mod logging;
pub mod methods;
pub mod toolkit;

pub use logging::init_logging;
pub use methods::{HostValue, Method, MethodRegistry};
pub use toolkit::Toolkit;

pub use pagekit_core::{
    Config, Error, GuardHandle, GuardRegistry, Notice, NoticeKind, NoticeSink, Result, Store,
    WatchHandle,
};
pub use pagekit_navigation::{
    EventChannel, Host, MemoryHost, NavigateError, Page, Payload, Relay, ShowHandle, ShowHooks,
};
