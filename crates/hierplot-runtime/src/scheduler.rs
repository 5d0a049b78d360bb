#![forbid(unsafe_code)]

//! Refresh scheduling.
//!
//! The plot refreshes when it mounts, when its host area is resized, and
//! whenever its [`Ticker`] fires. The default ticker polls on a fixed
//! interval; [`NotifyTicker`] lets a store push change notifications instead.
//! Time is always passed in, so schedules are reproducible in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use hierplot_core::geometry::Size;

/// Shortest interval an [`IntervalTicker`] will use.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A source of refresh ticks.
pub trait Ticker {
    /// Begin producing ticks, measured from `now`.
    fn start(&mut self, now: Instant);

    /// Stop producing ticks. Pending ticks are discarded.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Whether a tick is due at `now`. Fires at most once per call.
    fn poll(&mut self, now: Instant) -> bool;
}

/// Fires every `interval` while running.
///
/// Missed ticks do not queue: a poll long after the deadline fires once and
/// schedules the next tick one interval after that poll.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick is due, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    fn stop(&mut self) {
        self.next = None;
    }

    fn is_running(&self) -> bool {
        self.next.is_some()
    }

    fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(deadline) if now >= deadline => {
                self.next = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// Cloneable handle used to signal a [`NotifyTicker`].
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    pending: Arc<AtomicBool>,
}

impl Notifier {
    /// Request a refresh. Repeated calls before the next poll coalesce.
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
    }
}

/// Fires once per burst of notifications while running.
#[derive(Debug, Clone, Default)]
pub struct NotifyTicker {
    notifier: Notifier,
    running: bool,
}

impl NotifyTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that change listeners can keep.
    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    pub fn notify(&self) {
        self.notifier.notify();
    }
}

impl Ticker for NotifyTicker {
    fn start(&mut self, _now: Instant) {
        self.notifier.pending.store(false, Ordering::Release);
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
        self.notifier.pending.store(false, Ordering::Release);
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll(&mut self, _now: Instant) -> bool {
        self.running && self.notifier.pending.swap(false, Ordering::AcqRel)
    }
}

/// Why a refresh was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCause {
    Mounted,
    Interval,
    Resized,
}

/// Decides when the plot refreshes.
#[derive(Debug, Clone)]
pub struct RefreshScheduler<T: Ticker> {
    ticker: T,
    mounted: bool,
    pending_mount: bool,
    pending_resize: bool,
    size: Size,
}

impl<T: Ticker> RefreshScheduler<T> {
    pub fn new(ticker: T) -> Self {
        Self {
            ticker,
            mounted: false,
            pending_mount: false,
            pending_resize: false,
            size: Size::default(),
        }
    }

    /// Start scheduling. The next poll yields [`RefreshCause::Mounted`].
    pub fn mount(&mut self, now: Instant) {
        self.mounted = true;
        self.pending_mount = true;
        self.pending_resize = false;
        self.ticker.start(now);
        tracing::debug!("refresh scheduler mounted");
    }

    /// Stop scheduling. No poll yields a cause until the next mount.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending_mount = false;
        self.pending_resize = false;
        self.ticker.stop();
        tracing::debug!("refresh scheduler unmounted");
    }

    /// Record a new host size. A change while mounted forces a refresh on
    /// the next poll. Returns true when the size changed.
    pub fn resize(&mut self, size: Size) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        if self.mounted {
            self.pending_resize = true;
        }
        true
    }

    /// The refresh due at `now`, if any.
    pub fn poll(&mut self, now: Instant) -> Option<RefreshCause> {
        if !self.mounted {
            return None;
        }
        if std::mem::take(&mut self.pending_mount) {
            return Some(RefreshCause::Mounted);
        }
        if std::mem::take(&mut self.pending_resize) {
            return Some(RefreshCause::Resized);
        }
        self.ticker.poll(now).then_some(RefreshCause::Interval)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }
}
