// User-facing notices and loading signals emitted by the API client.
// Notices feed the Console tab; the loading flag lets a view show a spinner
// while a fetch for it is in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// A message for the console/toast surface.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warn,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Shared loading flag a caller may hand to an accessor to observe
/// load-start and load-end.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, value: bool) {
        self.0.store(value, Ordering::Relaxed);
    }
}

/// RAII guard that raises the flag on creation and lowers it on drop, so
/// load-end fires exactly once per call on every exit path.
#[derive(Debug, Default)]
pub struct LoadingGuard(Option<LoadingFlag>);

impl LoadingGuard {
    pub fn start(flag: Option<LoadingFlag>) -> Self {
        if let Some(flag) = &flag {
            flag.set(true);
        }
        Self(flag)
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if let Some(flag) = &self.0 {
            flag.set(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_raises_and_lowers_flag() {
        let flag = LoadingFlag::new();
        assert!(!flag.is_loading());
        {
            let _guard = LoadingGuard::start(Some(flag.clone()));
            assert!(flag.is_loading());
        }
        assert!(!flag.is_loading());
    }

    #[test]
    fn test_guard_lowers_flag_on_early_return() {
        fn falls_through(flag: LoadingFlag) -> Option<u32> {
            let _guard = LoadingGuard::start(Some(flag));
            let missing: Option<u32> = None;
            let value = missing?;
            Some(value + 1)
        }

        let flag = LoadingFlag::new();
        assert!(falls_through(flag.clone()).is_none());
        assert!(!flag.is_loading());
    }

    #[test]
    fn test_guard_without_flag_is_inert() {
        let _guard = LoadingGuard::start(None);
    }

    #[test]
    fn test_notice_levels() {
        assert_eq!(Notice::info("a").level, NoticeLevel::Info);
        assert_eq!(Notice::warn("b").level, NoticeLevel::Warn);
        assert_eq!(Notice::error("c").level, NoticeLevel::Error);
    }
}
