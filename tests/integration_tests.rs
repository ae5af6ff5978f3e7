//! Integration tests for the output pipeline
//!
//! These tests verify:
//! - Order preservation from a single producer
//! - Serialization of concurrent producers
//! - Graceful drain on exit
//! - Non-blocking writes with a slow sink
//! - Failure isolation and reporting
//! - Idempotent shutdown
//! - File output through the full stack

use parking_lot::Mutex;
use serial_output::sinks::FileSink;
use serial_output::{
    write_line, FailureReporter, LineEnding, Logger, LoggerBuilder, QueueError, Result, Sink,
};
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Sink that records every accepted string
#[derive(Clone, Default)]
struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl Sink for RecordingSink {
    fn accept(&mut self, text: &str) -> Result<()> {
        self.lines.lock().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

fn recording_logger() -> (Logger<RecordingSink>, RecordingSink) {
    let sink = RecordingSink::default();
    let logger = LoggerBuilder::new()
        .line_ending(LineEnding::Lf)
        .build(sink.clone())
        .expect("Failed to create logger");
    (logger, sink)
}

#[test]
fn test_single_producer_order_is_preserved() {
    let (logger, sink) = recording_logger();

    for i in 0..500 {
        write_line!(logger, "item {}", i).unwrap();
    }
    logger.exit();

    let expected: Vec<String> = (0..500).map(|i| format!("item {}\n", i)).collect();
    assert_eq!(sink.lines(), expected);
}

#[test]
fn test_concurrent_producers_are_serialized() {
    let (logger, sink) = recording_logger();
    let logger = Arc::new(logger);

    let mut handles = vec![];
    for thread_id in 0..8 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..250 {
                write_line!(logger, "{}:{}", thread_id, i).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Producer thread panicked");
    }
    logger.exit();

    let lines = sink.lines();
    assert_eq!(lines.len(), 2000);

    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), 2000, "An item was executed twice");

    // Each producer's own items keep their relative order.
    for thread_id in 0..8 {
        let prefix = format!("{}:", thread_id);
        let seen: Vec<usize> = lines
            .iter()
            .filter_map(|line| line.strip_prefix(&prefix))
            .map(|rest| rest.trim_end().parse().unwrap())
            .collect();
        assert_eq!(seen, (0..250).collect::<Vec<_>>());
    }
}

#[test]
fn test_exit_drains_pending_items() {
    let (logger, sink) = recording_logger();

    for i in 0..1000 {
        write_line!(logger, "{}", i).unwrap();
    }
    logger.exit();

    // No sleeping: exit must not return before the drain completes.
    assert_eq!(sink.lines().len(), 1000);
    assert_eq!(logger.metrics().executed(), 1000);
    assert_eq!(logger.metrics().pending(), 0);
}

#[test]
fn test_push_does_not_wait_for_slow_sink() {
    struct SlowSink {
        written: Arc<AtomicUsize>,
    }

    impl Sink for SlowSink {
        fn accept(&mut self, _text: &str) -> Result<()> {
            thread::sleep(Duration::from_millis(100));
            self.written.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    let written = Arc::new(AtomicUsize::new(0));
    let logger = Logger::new(SlowSink {
        written: Arc::clone(&written),
    })
    .unwrap();

    let start = Instant::now();
    for i in 0..5 {
        write_line!(logger, "slow {}", i).unwrap();
    }
    let push_time = start.elapsed();

    assert!(
        push_time < Duration::from_millis(250),
        "Pushes took {:?}",
        push_time
    );

    logger.exit();
    assert_eq!(written.load(Ordering::SeqCst), 5);
}

#[test]
fn test_failing_item_does_not_stop_later_items() {
    struct FlakySink {
        accepted: Arc<Mutex<Vec<String>>>,
    }

    impl Sink for FlakySink {
        fn accept(&mut self, text: &str) -> Result<()> {
            if text.starts_with("item 3") {
                return Err(QueueError::sink("flaky", "simulated write failure"));
            }
            self.accepted.lock().push(text.to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    let accepted = Arc::new(Mutex::new(Vec::new()));
    let reports = Arc::new(Mutex::new(Vec::new()));
    let reports_clone = Arc::clone(&reports);
    let reporter: FailureReporter = Arc::new(move |queue, err| {
        reports_clone.lock().push(format!("{}: {}", queue, err));
    });

    let logger = LoggerBuilder::new()
        .name("flaky-queue")
        .line_ending(LineEnding::Lf)
        .on_failure(reporter)
        .build(FlakySink {
            accepted: Arc::clone(&accepted),
        })
        .unwrap();

    for i in 1..=5 {
        // Producers never see the sink failure.
        write_line!(logger, "item {}", i).unwrap();
    }
    logger.exit();

    assert_eq!(
        *accepted.lock(),
        vec!["item 1\n", "item 2\n", "item 4\n", "item 5\n"]
    );

    let reports = reports.lock();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with("flaky-queue: "));
    assert!(reports[0].contains("simulated write failure"));
    assert_eq!(logger.metrics().failed(), 1);
    assert_eq!(logger.metrics().executed(), 4);
}

#[test]
fn test_panicking_sink_is_contained() {
    struct PanicSink {
        accepted: Arc<AtomicUsize>,
    }

    impl Sink for PanicSink {
        fn accept(&mut self, text: &str) -> Result<()> {
            if text == "boom" {
                panic!("sink exploded");
            }
            self.accepted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "panic"
        }
    }

    let accepted = Arc::new(AtomicUsize::new(0));
    let reported = Arc::new(Mutex::new(None));
    let reported_clone = Arc::clone(&reported);

    let logger = LoggerBuilder::new()
        .on_failure(Arc::new(move |_, err| {
            *reported_clone.lock() = Some(err.to_string());
        }))
        .build(PanicSink {
            accepted: Arc::clone(&accepted),
        })
        .unwrap();

    logger.write_str("before").unwrap();
    logger.write_str("boom").unwrap();
    logger.write_str("after").unwrap();
    logger.exit();

    assert_eq!(accepted.load(Ordering::SeqCst), 2);
    let reported = reported.lock();
    assert!(reported.as_deref().unwrap_or_default().contains("sink exploded"));
}

#[test]
fn test_exit_is_idempotent() {
    let (logger, sink) = recording_logger();

    for i in 0..10 {
        write_line!(logger, "{}", i).unwrap();
    }
    logger.exit();
    logger.exit();
    logger.exit();

    assert_eq!(sink.lines().len(), 10);
    assert!(matches!(
        write_line!(logger, "late"),
        Err(QueueError::QueueStopped)
    ));
    assert_eq!(sink.lines().len(), 10);
}

#[test]
fn test_concurrent_exit_callers_all_see_drained_queue() {
    let (logger, sink) = recording_logger();
    let logger = Arc::new(logger);

    for i in 0..200 {
        write_line!(logger, "{}", i).unwrap();
    }

    let mut handles = vec![];
    for _ in 0..4 {
        let logger = Arc::clone(&logger);
        let sink = sink.clone();
        handles.push(thread::spawn(move || {
            logger.exit();
            sink.lines().len()
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 200);
    }
}

#[test]
fn test_drop_performs_exit() {
    let (logger, sink) = recording_logger();
    for i in 0..50 {
        write_line!(logger, "{}", i).unwrap();
    }
    drop(logger);

    assert_eq!(sink.lines().len(), 50);
}

#[test]
fn test_file_output_through_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("pipeline.log");

    let logger = LoggerBuilder::new()
        .line_ending(LineEnding::CrLf)
        .build(FileSink::new(&path).expect("Failed to create file sink"))
        .unwrap();

    for i in 0..20 {
        write_line!(logger, "Message {}", i).unwrap();
    }
    logger.flush().unwrap();
    logger.exit();

    let content = fs::read_to_string(&path).expect("Failed to read output file");
    let lines: Vec<&str> = content.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 20);
    assert_eq!(lines[0], "Message 0");
    assert_eq!(lines[19], "Message 19");
}

#[test]
fn test_file_sink_flushed_on_exit_without_explicit_flush() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("unflushed.log");

    let logger = LoggerBuilder::new()
        .line_ending(LineEnding::Lf)
        .build(FileSink::new(&path).unwrap())
        .unwrap();
    write_line!(logger, "only line").unwrap();
    logger.exit();

    // The worker dropped the sink before exit returned.
    assert_eq!(fs::read_to_string(&path).unwrap(), "only line\n");
}

#[test]
fn test_independent_stacks_do_not_block_each_other() {
    struct GateSink {
        gate: Arc<Mutex<()>>,
    }

    impl Sink for GateSink {
        fn accept(&mut self, _text: &str) -> Result<()> {
            let _held = self.gate.lock();
            Ok(())
        }

        fn name(&self) -> &str {
            "gate"
        }
    }

    let gate = Arc::new(Mutex::new(()));
    let held = gate.lock();

    let blocked = Logger::new(GateSink {
        gate: Arc::clone(&gate),
    })
    .unwrap();
    let (free, sink) = recording_logger();

    write_line!(blocked, "stuck").unwrap();
    write_line!(free, "flows").unwrap();
    free.exit();

    assert_eq!(sink.lines(), vec!["flows\n"]);

    drop(held);
    blocked.exit();
    assert_eq!(blocked.metrics().executed(), 1);
}
