//! # Registries
//!
//! pagekit's core is three small pieces of state, each owned by a value
//! rather than living in globals:
//!
//! - [`GuardRegistry`]: one in-flight operation per key.
//! - [`Store`]: string keys to JSON values, with bounded watchers.
//! - [`Config`]: names and defaults shared with the navigation layer.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). No internal borrow
//! is held while user callbacks run, so callbacks may re-enter freely.
//!
//! User-facing misuse is reported as a [`notice::Notice`], never a panic.

pub mod config;
pub mod error;
pub mod guard;
pub mod notice;
pub mod store;
pub mod tests;
pub mod watch;

pub use config::*;
pub use error::*;
pub use guard::*;
pub use notice::{LogSink, Notice, NoticeKind, NoticeSink};
pub use store::*;
pub use watch::{WatchFn, WatchHandle};
