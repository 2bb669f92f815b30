//! Property-based tests for rust_fast_logger using proptest

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_fast_logger::prelude::*;
use rust_fast_logger::{FixedClock, TIMESTAMP_WIDTH};
use std::sync::Arc;
use std::time::Duration;

fn cache_at(secs: i64, style: TimestampStyle) -> (Arc<FixedClock>, Arc<TimestampCache>) {
    let at = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid datetime")
        + chrono::Duration::seconds(secs);
    let clock = Arc::new(FixedClock::new(at));
    let cache = Arc::new(TimestampCache::new(clock.clone(), style));
    (clock, cache)
}

fn channel_strategy() -> impl Strategy<Value = Channel> {
    prop_oneof![
        Just(Channel::Info),
        Just(Channel::Error),
        Just(Channel::Warning),
        Just(Channel::Success),
        Just(Channel::Fatal),
    ]
}

// ============================================================================
// Channel Tests
// ============================================================================

proptest! {
    /// Channel names parse back to the same channel
    #[test]
    fn test_channel_str_roundtrip(channel in channel_strategy()) {
        let parsed: Channel = channel.as_str().parse().unwrap();
        prop_assert_eq!(channel, parsed);
    }
}

// ============================================================================
// Record Tests
// ============================================================================

proptest! {
    /// Re-stamping a padded record keeps its length and everything after
    /// the date/time field
    #[test]
    fn test_restamp_preserves_length_and_tail(
        start in 0i64..400_000_000,
        step in 1i64..100_000_000,
        prefix in "[a-z\\[\\] ]{0,12}",
        body in "[ -~]{0,80}",
    ) {
        let (clock, cache) = cache_at(start, TimestampStyle::Padded);
        let mut record = Record::new();
        record.set_prefix(&prefix).append_bytes(&body);
        record.prepare_with(&cache);
        let before = record.as_bytes().to_vec();

        clock.advance(chrono::Duration::seconds(step));
        cache.refresh();
        let stamp = cache.current();
        record.refresh_timestamp(&stamp);
        let after = record.as_bytes();

        prop_assert_eq!(after.len(), before.len());
        prop_assert_eq!(&after[..TIMESTAMP_WIDTH], &stamp[..TIMESTAMP_WIDTH]);
        prop_assert_eq!(&after[TIMESTAMP_WIDTH..], &before[TIMESTAMP_WIDTH..]);
    }

    /// Compact timestamps change width; the tail still survives intact
    #[test]
    fn test_compact_restamp_keeps_tail(
        start in 0i64..400_000_000,
        step in 1i64..100_000_000,
        body in "[ -~]{0,40}",
    ) {
        let (clock, cache) = cache_at(start, TimestampStyle::Compact);
        let mut record = Record::new();
        record.append_bytes(&body).prepare_with(&cache);

        clock.advance(chrono::Duration::seconds(step));
        cache.refresh();
        let stamp = cache.current();
        record.refresh_timestamp(&stamp);

        let mut expected = stamp.to_vec();
        expected.extend_from_slice(body.as_bytes());
        expected.push(b'\n');
        prop_assert_eq!(record.as_bytes(), &expected[..]);
    }

    /// A second prepare without reset changes nothing
    #[test]
    fn test_double_prepare_is_noop(
        body in "[ -~]{0,60}",
        show_date in any::<bool>(),
        newline in any::<bool>(),
    ) {
        let (_clock, cache) = cache_at(0, TimestampStyle::Padded);
        let mut record = Record::new();
        if !show_date {
            record.disable_date();
        }
        record.set_newline(newline).append_bytes(&body).prepare_with(&cache);
        let once = record.as_bytes().to_vec();
        record.prepare_with(&cache);
        prop_assert_eq!(record.as_bytes(), &once[..]);
    }

    /// reset followed by the same appends and prepare rebuilds the same line
    #[test]
    fn test_reset_rebuild_is_idempotent(
        prefix in "[a-z]{0,8}",
        words in prop::collection::vec("[a-z0-9]{1,10}", 0..8),
        number in any::<i64>(),
    ) {
        let (_clock, cache) = cache_at(0, TimestampStyle::Padded);
        let build = |record: &mut Record| {
            for word in &words {
                record.append_args(&[word.as_str().into(), " ".into()]);
            }
            record.append_args(&[number.into()]).prepare_with(&cache);
        };

        let mut record = Record::new();
        record.set_prefix(&prefix);
        build(&mut record);
        let first = record.as_bytes().to_vec();

        record.reset();
        build(&mut record);
        prop_assert_eq!(record.as_bytes(), &first[..]);
    }
}

// ============================================================================
// Buffered Logger Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Lines on one channel come out in the order they were logged
    #[test]
    fn test_same_channel_order(lines in prop::collection::vec("[a-zA-Z0-9 ]{0,30}", 1..50)) {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .show_date(false)
            .sink(Channel::Success, sink.clone())
            .flush_interval(Duration::from_secs(3600))
            .build_buffered()
            .unwrap();

        for (i, line) in lines.iter().enumerate() {
            logger.success(&[line.as_str().into()]);
            if i % 7 == 3 {
                logger.flush().unwrap();
            }
        }
        logger.flush().unwrap();

        let expected: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        prop_assert_eq!(sink.contents_string(), expected);
    }

    /// Raw bytes are delivered unchanged
    #[test]
    fn test_raw_is_verbatim(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..10)) {
        let sink = MemorySink::new();
        let logger = LoggerBuilder::new()
            .sink(Channel::Raw, sink.clone())
            .flush_interval(Duration::from_secs(3600))
            .build_buffered()
            .unwrap();

        for chunk in &chunks {
            logger.raw(chunk);
        }
        logger.flush().unwrap();

        prop_assert_eq!(sink.contents(), chunks.concat());
    }
}
