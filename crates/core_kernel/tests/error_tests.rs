//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_invalid_state() {
    let error = CoreError::invalid_state("Cannot transition from TAKEN to UNASSIGNED");

    match error {
        CoreError::InvalidStateTransition(msg) => assert!(msg.contains("Cannot transition")),
        _ => panic!("Expected InvalidStateTransition error"),
    }
}

#[test]
fn test_core_error_not_found() {
    let error = CoreError::not_found("Order not found");

    match error {
        CoreError::NotFound(msg) => assert_eq!(msg, "Order not found"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_core_error_display() {
    let error = CoreError::configuration("missing API_DATABASE_URL");
    assert_eq!(error.to_string(), "Configuration error: missing API_DATABASE_URL");
}

#[test]
fn test_port_error_display() {
    let error = PortError::Timeout {
        operation: "claim ORD-1".to_string(),
        duration_ms: 250,
    };
    assert_eq!(error.to_string(), "Timeout after 250ms: claim ORD-1");
}

#[test]
fn test_port_error_source_chain() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
    let error = PortError::Connection {
        message: "lost connection".to_string(),
        source: Some(Box::new(io)),
    };

    let source = std::error::Error::source(&error).expect("source should be set");
    assert_eq!(source.to_string(), "reset");
}
