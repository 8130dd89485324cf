//! Error types for swmgmt-routed

use crate::route::RouteError;
use thiserror::Error;

/// Route daemon errors
#[derive(Error, Debug)]
pub enum RoutedError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Route engine error
    #[error(transparent)]
    Route(#[from] RouteError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for daemon operations
pub type Result<T> = std::result::Result<T, RoutedError>;
