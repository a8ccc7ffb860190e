use pagekit_core::NoticeSink;
use thiserror::Error;

use crate::{EventChannel, Page};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct NavigateError {
    pub reason: String,
}

impl NavigateError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// What pagekit needs from the mini-program runtime.
///
/// `current_pages` is ordered bottom to top; only the last entry is ever
/// read. `navigate` opens `url` on top of the stack and returns the opener's
/// end of the event channel shared with the new page.
pub trait Host: NoticeSink {
    fn current_pages(&self) -> Vec<Page>;
    fn navigate(&self, url: &str) -> Result<EventChannel, NavigateError>;

    fn top_page(&self) -> Option<Page> {
        self.current_pages().pop()
    }
}
