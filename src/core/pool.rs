//! Reuse pool for [`Record`]s
//!
//! Records taken from a pool come back as [`PooledRecord`], a distinct type
//! that returns its record to the pool when dropped. A `PooledRecord` passed
//! by value to a record logging call is released when the call returns, so
//! it cannot be touched afterwards. Release only ever sees the record the
//! handle holds at drop time; swapping a caller-built [`Record`] in through
//! `DerefMut` puts that record in the pool instead. Released records are
//! reset and lose their prefix either way.

use super::record::Record;
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, OnceLock};

/// Idle records kept by the global pool
pub const DEFAULT_MAX_IDLE: usize = 1024;

/// Records whose buffer grew past this are dropped instead of pooled
pub const MAX_POOLED_CAPACITY: usize = 64 * 1024;

#[derive(Debug)]
pub struct RecordPool {
    idle: Mutex<Vec<Record>>,
    max_idle: usize,
}

static GLOBAL_POOL: OnceLock<Arc<RecordPool>> = OnceLock::new();

impl RecordPool {
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// The process-wide pool
    pub fn global() -> Arc<RecordPool> {
        Arc::clone(GLOBAL_POOL.get_or_init(|| Arc::new(RecordPool::new(DEFAULT_MAX_IDLE))))
    }

    /// Take a record with default configuration, reusing an idle one if possible
    pub fn acquire(self: &Arc<Self>) -> PooledRecord {
        let record = self.idle.lock().pop().unwrap_or_default();
        PooledRecord {
            record,
            pool: Arc::clone(self),
        }
    }

    /// Number of records waiting for reuse
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, mut record: Record) {
        if record.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        record.reset();
        record.clear_prefix();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(record);
        }
    }
}

impl Default for RecordPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

/// Take a record from the global pool
///
/// # Example
///
/// ```
/// let mut rec = rust_fast_logger::record();
/// rec.disable_date().append_args(&["hello".into()]).prepare();
/// assert_eq!(rec.as_bytes(), b"hello\n");
/// // dropping `rec` returns it to the pool
/// ```
pub fn record() -> PooledRecord {
    RecordPool::global().acquire()
}

/// A [`Record`] on loan from a [`RecordPool`]
#[derive(Debug)]
pub struct PooledRecord {
    record: Record,
    pool: Arc<RecordPool>,
}

impl Deref for PooledRecord {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.record
    }
}

impl DerefMut for PooledRecord {
    fn deref_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}

impl std::borrow::Borrow<Record> for PooledRecord {
    fn borrow(&self) -> &Record {
        &self.record
    }
}

impl std::borrow::BorrowMut<Record> for PooledRecord {
    fn borrow_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}

impl Drop for PooledRecord {
    fn drop(&mut self) {
        let record = std::mem::take(&mut self.record);
        self.pool.release(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_reuses() {
        let pool = Arc::new(RecordPool::new(4));
        assert_eq!(pool.idle(), 0);

        let mut rec = pool.acquire();
        rec.set_prefix("[old] ").disable_date().append_bytes("abc").prepare();
        drop(rec);
        assert_eq!(pool.idle(), 1);

        let rec = pool.acquire();
        assert_eq!(pool.idle(), 0);
        assert!(rec.is_empty());
        assert!(rec.prefix().is_empty());
        assert!(rec.shows_date());
        assert!(!rec.is_prepared());
    }

    #[test]
    fn test_swapped_in_record_is_released_clean() {
        let pool = Arc::new(RecordPool::new(4));
        let mut pooled = pool.acquire();
        let mut owned = Record::new();
        owned.set_prefix("[mine] ").append_bytes("payload").prepare();

        std::mem::swap(&mut *pooled, &mut owned);
        drop(pooled);
        assert_eq!(pool.idle(), 1);

        let rec = pool.acquire();
        assert!(rec.is_empty());
        assert!(rec.prefix().is_empty());
        assert!(!rec.is_prepared());
    }

    #[test]
    fn test_max_idle_is_respected() {
        let pool = Arc::new(RecordPool::new(2));
        let records: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(records);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_oversized_records_are_not_pooled() {
        let pool = Arc::new(RecordPool::new(2));
        let mut rec = pool.acquire();
        rec.append_bytes(vec![b'x'; MAX_POOLED_CAPACITY + 1]);
        drop(rec);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = Arc::new(RecordPool::new(64));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for j in 0..500 {
                        let mut rec = pool.acquire();
                        assert!(rec.is_empty(), "record handed out while still in use");
                        rec.append_args(&[i.into(), j.into()]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("worker panicked");
        }
        assert!(pool.idle() <= 64);
    }
}
