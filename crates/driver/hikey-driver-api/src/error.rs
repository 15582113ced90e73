//! Driver error types.

use core::fmt;

/// Errors that can occur during driver operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// An argument (logical index, descriptor set) was not recognized.
    InvalidArgument,
    /// The requested operation or protocol is not supported.
    Unsupported,
    /// The requested device or protocol does not exist.
    NotFound,
    /// An allocation failed.
    NoMemory,
    /// The physical-memory mapping primitive failed.
    ResourceMappingFailed,
    /// Sub-system initialization failed.
    InitFailed,
    /// An I/O error occurred during a hardware operation.
    IoError,
    /// The driver is not in a valid state for this operation.
    InvalidState,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::Unsupported => f.write_str("operation not supported"),
            Self::NotFound => f.write_str("not found"),
            Self::NoMemory => f.write_str("out of memory"),
            Self::ResourceMappingFailed => f.write_str("resource mapping failed"),
            Self::InitFailed => f.write_str("initialization failed"),
            Self::IoError => f.write_str("I/O error"),
            Self::InvalidState => f.write_str("invalid driver state"),
        }
    }
}

impl core::error::Error for DriverError {}
