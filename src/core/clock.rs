//! Cached wall-clock timestamps
//!
//! Formatting a date on every log call is the single most expensive part of
//! building a line. Instead, a [`TimestampCache`] holds one pre-formatted
//! timestamp that a background thread replaces on a fixed cadence, and every
//! log call copies those bytes. Lines logged within one refresh window share
//! an identical timestamp.

use arc_swap::ArcSwap;
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

/// Width of the date/time field of a [`TimestampStyle::Padded`] timestamp,
/// not counting the trailing space.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Default cadence of the refresher thread
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(300);

/// Source of wall-clock time for a [`TimestampCache`]
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
///
/// # Example
///
/// ```
/// use rust_fast_logger::core::clock::{FixedClock, TimestampCache, TimestampStyle};
/// use chrono::NaiveDate;
/// use std::sync::Arc;
///
/// let at = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap().and_hms_opt(10, 30, 5).unwrap();
/// let cache = TimestampCache::new(Arc::new(FixedClock::new(at)), TimestampStyle::Padded);
/// assert_eq!(&cache.current()[..], b"2025/01/08 10:30:05 ");
/// ```
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at: Mutex::new(at) }
    }

    pub fn set(&self, at: NaiveDateTime) {
        *self.at.lock() = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut at = self.at.lock();
        *at += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.at.lock()
    }
}

/// Layout of the cached timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampStyle {
    /// `2025/01/08 09:05:07 `: every field zero-padded, always 19 bytes
    /// plus one space. Prepared records can be re-stamped in place.
    #[default]
    Padded,

    /// `2025/1/8 9:5:07 `: only the seconds are zero-padded. Matches log
    /// files written by older tooling byte for byte, but the width varies.
    Compact,
}

impl TimestampStyle {
    /// Format `datetime` followed by a single space
    #[must_use]
    pub fn format(&self, datetime: &NaiveDateTime) -> Vec<u8> {
        let mut buf = Vec::with_capacity(TIMESTAMP_WIDTH + 1);
        self.format_into(datetime, &mut buf);
        buf
    }

    pub fn format_into(&self, datetime: &NaiveDateTime, buf: &mut Vec<u8>) {
        let (year, month, day) = (datetime.year(), datetime.month(), datetime.day());
        let (hour, minute, second) = (datetime.hour(), datetime.minute(), datetime.second());
        // Writes into a Vec<u8> cannot fail.
        let _ = match self {
            TimestampStyle::Padded => write!(
                buf,
                "{:04}/{:02}/{:02} {:02}:{:02}:{:02} ",
                year, month, day, hour, minute, second
            ),
            TimestampStyle::Compact => write!(
                buf,
                "{}/{}/{} {}:{}:{:02} ",
                year, month, day, hour, minute, second
            ),
        };
    }

    /// Whether every timestamp of this style has the same length
    #[must_use]
    pub fn is_fixed_width(&self) -> bool {
        matches!(self, TimestampStyle::Padded)
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampStyle::Padded => "Zero-padded date and time (2025/01/08 09:05:07)",
            TimestampStyle::Compact => "Unpadded date and time, padded seconds (2025/1/8 9:5:07)",
        }
    }
}

/// Format `datetime` in `style`, trailing space included
pub fn format_timestamp(datetime: &NaiveDateTime, style: TimestampStyle) -> Vec<u8> {
    style.format(datetime)
}

/// A shared, periodically refreshed, pre-formatted timestamp.
///
/// Readers never block and never see a partially written value: a refresh
/// publishes a whole new buffer.
pub struct TimestampCache {
    current: ArcSwap<Vec<u8>>,
    clock: Arc<dyn Clock>,
    style: TimestampStyle,
    refresher_started: AtomicBool,
}

static GLOBAL_CACHE: OnceLock<Arc<TimestampCache>> = OnceLock::new();

impl TimestampCache {
    /// Create a cache and publish the clock's current time immediately
    pub fn new(clock: Arc<dyn Clock>, style: TimestampStyle) -> Self {
        let initial = style.format(&clock.now());
        Self {
            current: ArcSwap::from_pointee(initial),
            clock,
            style,
            refresher_started: AtomicBool::new(false),
        }
    }

    /// A cache over the local wall clock, without a refresher
    pub fn system(style: TimestampStyle) -> Self {
        Self::new(Arc::new(SystemClock), style)
    }

    /// The process-wide cache.
    ///
    /// Uses the local clock and [`TimestampStyle::Padded`]. Its refresher is
    /// started on first use and runs until the process exits.
    pub fn global() -> Arc<TimestampCache> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| {
            let cache = Arc::new(TimestampCache::system(TimestampStyle::Padded));
            cache.start_refresher(DEFAULT_REFRESH_INTERVAL);
            cache
        }))
    }

    /// The most recently published timestamp
    #[inline]
    pub fn current(&self) -> Arc<Vec<u8>> {
        self.current.load_full()
    }

    /// Run `f` against the current timestamp without cloning the handle
    #[inline]
    pub fn with_current<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let guard = self.current.load();
        f(guard.as_slice())
    }

    pub fn style(&self) -> TimestampStyle {
        self.style
    }

    /// Recompute the timestamp from the clock and publish it
    pub fn refresh(&self) {
        let next = self.style.format(&self.clock.now());
        self.current.store(Arc::new(next));
    }

    /// Start the background refresher unless one is already running.
    ///
    /// The thread holds a weak reference and exits once the cache is
    /// dropped. Returns `true` if this call started it.
    pub fn start_refresher(self: &Arc<Self>, interval: Duration) -> bool {
        if self
            .refresher_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let weak = Arc::downgrade(self);
        let spawned = thread::Builder::new()
            .name("timestamp-refresher".to_string())
            .spawn(move || loop {
                thread::sleep(interval);
                match weak.upgrade() {
                    Some(cache) => cache.refresh(),
                    None => break,
                }
            });

        match spawned {
            Ok(_) => true,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to spawn timestamp refresher: {}", e);
                self.refresher_started.store(false, Ordering::Release);
                false
            }
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresher_started.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for TimestampCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimestampCache")
            .field("current", &String::from_utf8_lossy(&self.current()))
            .field("style", &self.style)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid datetime")
    }

    #[test]
    fn test_padded_format() {
        let ts = TimestampStyle::Padded.format(&at(2025, 1, 8, 9, 5, 7));
        assert_eq!(ts, b"2025/01/08 09:05:07 ");
        assert_eq!(ts.len(), TIMESTAMP_WIDTH + 1);
    }

    #[test]
    fn test_compact_format_pads_only_seconds() {
        let ts = TimestampStyle::Compact.format(&at(2025, 1, 8, 9, 5, 7));
        assert_eq!(ts, b"2025/1/8 9:5:07 ");

        let ts = format_timestamp(&at(2024, 12, 31, 23, 59, 59), TimestampStyle::Compact);
        assert_eq!(ts, b"2024/12/31 23:59:59 ");
    }

    #[test]
    fn test_padded_is_fixed_width() {
        assert!(TimestampStyle::Padded.is_fixed_width());
        assert!(!TimestampStyle::Compact.is_fixed_width());
        for (mo, d, h) in [(1, 1, 0), (12, 31, 23), (6, 9, 10)] {
            assert_eq!(TimestampStyle::Padded.format(&at(2025, mo, d, h, 0, 0)).len(), 20);
        }
    }

    #[test]
    fn test_cache_publishes_on_construction_and_refresh() {
        let clock = Arc::new(FixedClock::new(at(2025, 3, 4, 5, 6, 7)));
        let cache = TimestampCache::new(clock.clone(), TimestampStyle::Padded);
        assert_eq!(&cache.current()[..], b"2025/03/04 05:06:07 ");

        clock.advance(chrono::Duration::seconds(1));
        // Not visible until the next refresh
        assert_eq!(&cache.current()[..], b"2025/03/04 05:06:07 ");
        cache.refresh();
        assert_eq!(&cache.current()[..], b"2025/03/04 05:06:08 ");
    }

    #[test]
    fn test_old_snapshot_is_not_mutated() {
        let clock = Arc::new(FixedClock::new(at(2025, 3, 4, 5, 6, 7)));
        let cache = TimestampCache::new(clock.clone(), TimestampStyle::Padded);
        let before = cache.current();
        clock.advance(chrono::Duration::minutes(1));
        cache.refresh();
        assert_eq!(&before[..], b"2025/03/04 05:06:07 ");
        assert_eq!(&cache.current()[..], b"2025/03/04 05:07:07 ");
    }

    #[test]
    fn test_refresher_starts_once_and_updates() {
        let clock = Arc::new(FixedClock::new(at(2025, 3, 4, 5, 6, 7)));
        let cache = Arc::new(TimestampCache::new(clock.clone(), TimestampStyle::Padded));
        assert!(cache.start_refresher(Duration::from_millis(5)));
        assert!(!cache.start_refresher(Duration::from_millis(5)));

        clock.set(at(2026, 1, 1, 0, 0, 0));
        thread::sleep(Duration::from_millis(100));
        cache.with_current(|ts| assert_eq!(ts, b"2026/01/01 00:00:00 "));
    }

    #[test]
    fn test_global_is_shared() {
        let a = TimestampCache::global();
        let b = TimestampCache::global();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_refreshing());
        assert_eq!(a.current().len(), TIMESTAMP_WIDTH + 1);
    }

    #[test]
    fn test_style_serialization() {
        let json = serde_json::to_string(&TimestampStyle::Compact).expect("serialize");
        assert_eq!(json, "\"Compact\"");
        let style: TimestampStyle = serde_json::from_str("\"Padded\"").expect("deserialize");
        assert_eq!(style, TimestampStyle::Padded);
    }
}
