//! Tests for warning deduplication.

use thicket_common::warning::{warn_once, warned};

#[test]
fn test_warn_once_records_message() {
    assert!(!warned("Test", "first message"));
    warn_once("Test", "first message");
    assert!(warned("Test", "first message"));
}

#[test]
fn test_warned_is_scoped_by_component() {
    warn_once("Alpha", "shared text");
    assert!(warned("Alpha", "shared text"));
    assert!(!warned("Beta", "shared text"));
}

#[test]
fn test_warn_once_repeated_calls_are_harmless() {
    warn_once("Test", "repeated");
    warn_once("Test", "repeated");
    assert!(warned("Test", "repeated"));
}
