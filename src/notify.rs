//! Transient status toasts.

use std::time::{Duration, Instant};
use tracing::debug;

/// How long each toast stays visible.
const TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub kind: Kind,
    created: Instant,
}

impl Notification {
    /// Elapsed fraction of the toast's lifetime, 0.0 to 1.0.
    pub fn age_fraction(&self, ttl: Duration) -> f32 {
        (self.created.elapsed().as_secs_f32() / ttl.as_secs_f32()).min(1.0)
    }
}

/// Stacking toast list. Toasts expire after a fixed TTL; there is no
/// deduplication.
#[derive(Debug)]
pub struct NotificationCenter {
    toasts: Vec<Notification>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            ttl: TOAST_TTL,
        }
    }

    #[cfg(test)]
    fn with_ttl(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
        }
    }

    pub fn notify(&mut self, text: impl Into<String>, kind: Kind) {
        let text = text.into();
        debug!("Notification ({:?}): {}", kind, text);
        self.toasts.push(Notification {
            text,
            kind,
            created: Instant::now(),
        });
    }

    /// Drop expired toasts and return the live ones, oldest first.
    pub fn active(&mut self) -> &[Notification] {
        let ttl = self.ttl;
        self.toasts.retain(|t| t.created.elapsed() < ttl);
        &self.toasts
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_stack_in_order() {
        let mut center = NotificationCenter::new();
        center.notify("first", Kind::Info);
        center.notify("second", Kind::Error);

        let active = center.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].text, "first");
        assert_eq!(active[1].text, "second");
    }

    #[test]
    fn test_no_deduplication() {
        let mut center = NotificationCenter::new();
        center.notify("same", Kind::Info);
        center.notify("same", Kind::Info);
        assert_eq!(center.active().len(), 2);
    }

    #[test]
    fn test_toasts_expire_after_ttl() {
        let mut center = NotificationCenter::with_ttl(Duration::from_millis(0));
        center.notify("gone", Kind::Warning);
        assert!(center.active().is_empty());
    }

    #[test]
    fn test_age_fraction_caps_at_one() {
        let mut center = NotificationCenter::with_ttl(Duration::from_nanos(1));
        center.notify("old", Kind::Info);
        std::thread::sleep(Duration::from_millis(1));
        let toast = center.toasts.first().unwrap();
        assert_eq!(toast.age_fraction(center.ttl), 1.0);
    }
}
