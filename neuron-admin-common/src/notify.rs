use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Mutex,
};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A user-facing message produced by an admin operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{:?}] {}", self.level, self.message)
    }
}

/// Sink for user-facing success/warning/error messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        })
    }

    fn warning(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        })
    }

    fn error(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.notify(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        })
    }
}

/// Emits notices as tracing events under the `notice` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(target: "notice", "{}", notice.message),
            NoticeLevel::Warning => warn!(target: "notice", "{}", notice.message),
            NoticeLevel::Error => error!(target: "notice", "{}", notice.message),
        }
    }
}

/// Keeps every notice in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

impl<N: Notifier> Notifier for &N {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}
