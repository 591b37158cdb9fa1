pub mod logger;
pub mod notify;

pub use logger::Logger;
pub use notify::{MemoryNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
