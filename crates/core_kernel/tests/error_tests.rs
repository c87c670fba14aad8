//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::{AdapterSource, PortError};

#[test]
fn test_core_error_configuration_from_bad_source() {
    let error = AdapterSource::from_setting("remote", Some("  ")).unwrap_err();
    assert!(matches!(error, CoreError::Configuration(_)));
    assert!(error.to_string().contains("Configuration error"));
}

#[test]
fn test_port_error_display() {
    let error = PortError::timeout("identity.verify", 1500);
    let display = format!("{}", error);

    assert!(display.contains("1500ms"));
    assert!(display.contains("identity.verify"));
}
