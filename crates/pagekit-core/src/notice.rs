//! User-visible, non-fatal notices.
//!
//! The host reports misuse (registering something that is not callable,
//! looking up a key that was never registered) as a modal dialog rather
//! than a fault. A [`Notice`] is the data for one such dialog; showing it is
//! up to whoever implements [`NoticeSink`].

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    InvalidArgument,
    UnregisteredKey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub content: String,
    pub show_cancel: bool,
}

impl Notice {
    pub fn invalid_argument(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::InvalidArgument,
            title: title.into(),
            content: content.into(),
            show_cancel: false,
        }
    }

    pub fn unregistered_key(title: impl Into<String>, key: &str) -> Self {
        Self {
            kind: NoticeKind::UnregisteredKey,
            title: title.into(),
            content: format!("{key} does not exist"),
            show_cancel: false,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.content)
    }
}

/// Anything able to put a notice in front of the user.
pub trait NoticeSink {
    fn show_modal(&self, notice: &Notice);
}

/// Sink that only logs; used when no host is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl NoticeSink for LogSink {
    fn show_modal(&self, notice: &Notice) {
        log::warn!("{notice}");
    }
}
