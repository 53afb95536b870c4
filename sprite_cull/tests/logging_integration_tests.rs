//! Integration tests for the logging system
//!
//! These tests verify that culler construction and configuration errors go
//! through the pluggable logger.
//!
//! Run with: cargo test --test logging_integration_tests

use sprite_cull::cull2d::culling::{
    create_culler, Culler, CullerConfig, LinearConfig, MockSprite, SpatialHashConfig, AABB,
};
use sprite_cull::cull2d::log::{
    Logger, LogEntry, LogSeverity, reset_logger, set_logger, set_min_severity,
};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn restore_defaults() {
    set_min_severity(LogSeverity::Info);
    reset_logger();
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_invalid_config_is_logged_as_error() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);

    let result = create_culler::<MockSprite>(CullerConfig::SpatialHash(
        SpatialHashConfig::with_cell_size(-10.0),
    ));
    assert!(result.is_err());

    {
        let captured = entries.lock().unwrap();
        let errors: Vec<&LogEntry> = captured
            .iter()
            .filter(|e| e.source == "cull2d::SpatialHashCuller")
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, LogSeverity::Error);
        assert!(errors[0].message.contains("cell width"));
        assert!(errors[0].file.is_some());
        assert!(errors[0].line.is_some());
    }

    restore_defaults();
}

#[test]
#[serial]
fn test_integration_creation_logged_at_debug() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);
    set_min_severity(LogSeverity::Debug);

    let _linear = create_culler::<MockSprite>(CullerConfig::Linear(LinearConfig::default())).unwrap();
    let _hash = create_culler::<MockSprite>(CullerConfig::SpatialHash(SpatialHashConfig::default())).unwrap();

    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().any(|e| {
            e.source == "cull2d::LinearCuller" && e.severity == LogSeverity::Debug
        }));
        assert!(captured.iter().any(|e| {
            e.source == "cull2d::SpatialHashCuller" && e.severity == LogSeverity::Debug
        }));
    }

    restore_defaults();
}

#[test]
#[serial]
fn test_integration_frame_messages_hidden_at_default_threshold() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);
    set_min_severity(LogSeverity::Info);

    let mut culler = create_culler::<MockSprite>(CullerConfig::default()).unwrap();
    let key = culler.add(MockSprite::at(AABB::new(0.0, 0.0, 10.0, 10.0)), false);
    for _ in 0..10 {
        culler.cull(&AABB::new(0.0, 0.0, 100.0, 100.0), false);
    }
    culler.remove(key);
    culler.remove(key);

    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().all(|e| !e.source.starts_with("cull2d::")));
    }

    restore_defaults();
}

#[test]
#[serial]
fn test_integration_frame_messages_logged_at_trace() {
    let (test_logger, entries) = TestLogger::new();
    set_logger(test_logger);
    set_min_severity(LogSeverity::Trace);

    let mut culler = create_culler::<MockSprite>(CullerConfig::SpatialHash(
        SpatialHashConfig::with_cell_size(50.0),
    )).unwrap();
    culler.add(MockSprite::at(AABB::new(0.0, 0.0, 10.0, 10.0)), false);
    culler.cull(&AABB::new(0.0, 0.0, 100.0, 100.0), false);

    {
        let captured = entries.lock().unwrap();
        let trace: Vec<&LogEntry> = captured
            .iter()
            .filter(|e| e.severity == LogSeverity::Trace && e.source == "cull2d::SpatialHashCuller")
            .collect();
        assert_eq!(trace.len(), 1);
        assert!(trace[0].message.contains("1 visible"));
    }

    restore_defaults();
}
