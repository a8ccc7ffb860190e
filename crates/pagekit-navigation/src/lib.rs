//! # Pages and navigation
//!
//! Helpers that sit on top of a mini-program page stack:
//!
//! - [`ShowHooks`]: run a callback once, the next time the current page is
//!   shown again (typically after a page pushed on top of it is closed).
//! - [`Relay`]: navigate to a page and hand it a JSON object through the
//!   navigation event channel; the target page awaits it with
//!   [`Relay::receive_data`].
//!
//! The runtime itself is abstracted by [`Host`]. [`MemoryHost`] implements it
//! with an in-memory back stack:
//!
//! ```rust
//! use pagekit_navigation::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let host = MemoryHost::new("pages/list");
//! let hooks = ShowHooks::new();
//! let refreshed = Rc::new(Cell::new(false));
//!
//! let r = refreshed.clone();
//! let nav = host.clone();
//! hooks
//!     .on_next_show_with(&host, move || r.set(true), || {
//!         nav.navigate("pages/edit").unwrap();
//!     })
//!     .unwrap();
//!
//! assert!(!refreshed.get());
//! host.navigate_back();
//! assert!(refreshed.get());
//! ```

pub mod channel;
pub mod host;
pub mod memory;
pub mod page;
pub mod relay;
pub mod show;

pub use channel::EventChannel;
pub use host::{Host, NavigateError};
pub use memory::{MAX_STACK_DEPTH, MemoryHost};
pub use page::{Page, ShowFn};
pub use relay::{Payload, Relay};
pub use show::{LAST_SHOW_HANDLE, ShowHandle, ShowHooks};
