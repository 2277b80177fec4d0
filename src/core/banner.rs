// ClassDesk - core/banner.rs
//
// Dismissible success/error banners, one per panel.
// Timeouts are cosmetic: an expired banner is simply no longer drawn.

use crate::core::model::Panel;
use crate::util::constants::{BANNER_TIMEOUT_SECS, ERROR_BANNER_TIMEOUT_SECS};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Active banners keyed by panel. Raising a banner on a panel replaces
/// whatever that panel was showing.
#[derive(Debug, Clone)]
pub struct BannerBoard {
    banners: HashMap<Panel, Banner>,
    timeout: Duration,
    error_timeout: Duration,
}

impl Default for BannerBoard {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(BANNER_TIMEOUT_SECS),
            Duration::from_secs(ERROR_BANNER_TIMEOUT_SECS),
        )
    }
}

impl BannerBoard {
    pub fn new(timeout: Duration, error_timeout: Duration) -> Self {
        Self {
            banners: HashMap::new(),
            timeout,
            error_timeout,
        }
    }

    pub fn raise(
        &mut self,
        panel: Panel,
        kind: BannerKind,
        message: impl Into<String>,
        now: Instant,
    ) {
        self.banners.insert(
            panel,
            Banner {
                kind,
                message: message.into(),
                raised_at: now,
            },
        );
    }

    pub fn success(&mut self, panel: Panel, message: impl Into<String>, now: Instant) {
        self.raise(panel, BannerKind::Success, message, now);
    }

    pub fn error(&mut self, panel: Panel, message: impl Into<String>, now: Instant) {
        self.raise(panel, BannerKind::Error, message, now);
    }

    pub fn info(&mut self, panel: Panel, message: impl Into<String>, now: Instant) {
        self.raise(panel, BannerKind::Info, message, now);
    }

    pub fn get(&self, panel: Panel) -> Option<&Banner> {
        self.banners.get(&panel)
    }

    pub fn dismiss(&mut self, panel: Panel) {
        self.banners.remove(&panel);
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    /// Drop banners that have outlived their timeout.
    pub fn expire(&mut self, now: Instant) {
        let (timeout, error_timeout) = (self.timeout, self.error_timeout);
        self.banners.retain(|_, b| {
            let limit = match b.kind {
                BannerKind::Error => error_timeout,
                BannerKind::Success | BannerKind::Info => timeout,
            };
            now.saturating_duration_since(b.raised_at) < limit
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BannerBoard {
        BannerBoard::new(Duration::from_secs(4), Duration::from_secs(8))
    }

    #[test]
    fn test_raise_replaces_per_panel() {
        let mut b = board();
        let t0 = Instant::now();
        b.success(Panel::Students, "Student added", t0);
        b.error(Panel::Students, "Email taken", t0);
        b.info(Panel::Content, "Uploading...", t0);

        let students = b.get(Panel::Students).unwrap();
        assert_eq!(students.kind, BannerKind::Error);
        assert_eq!(students.message, "Email taken");
        assert!(b.get(Panel::Content).is_some());
    }

    #[test]
    fn test_success_expires_before_error() {
        let mut b = board();
        let t0 = Instant::now();
        b.success(Panel::Settings, "Saved", t0);
        b.error(Panel::Import, "Import failed", t0);

        b.expire(t0 + Duration::from_secs(5));
        assert!(b.get(Panel::Settings).is_none());
        assert!(b.get(Panel::Import).is_some());

        b.expire(t0 + Duration::from_secs(8));
        assert!(b.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let mut b = board();
        b.error(Panel::Detail, "Offline", Instant::now());
        b.dismiss(Panel::Detail);
        assert!(b.get(Panel::Detail).is_none());
    }
}
