//! Error types for Shipyard core.

use std::{error::Error, fmt};

/// Error type for Shipyard core operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipyardError {
    /// A caller-fixable problem with an id, filter value, or ship field.
    InvalidArgument(String),
    /// No ship exists for the requested id.
    NotFound(String),
    /// A structurally required field was absent from the request body.
    MissingField(&'static str),
    /// The ship store failed to complete the operation.
    Storage(String),
}

impl ShipyardError {
    /// Build an [`ShipyardError::InvalidArgument`] from any message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Build a [`ShipyardError::Storage`] from any displayable failure.
    pub fn storage(err: impl fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Whether the caller can fix the request and try again.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl fmt::Display for ShipyardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::MissingField(field) => write!(f, "Ship {field} must be provided"),
            Self::Storage(message) => write!(f, "storage error: {message}"),
        }
    }
}

impl Error for ShipyardError {}

/// Convenience result type for Shipyard core.
pub type Result<T> = std::result::Result<T, ShipyardError>;

#[cfg(test)]
mod tests {
    use super::ShipyardError;

    #[test]
    fn invalid_argument_formats_message() {
        let error = ShipyardError::invalid("Ship name must not be empty");
        assert_eq!(format!("{error}"), "Ship name must not be empty");
    }

    #[test]
    fn missing_field_names_the_field() {
        let error = ShipyardError::MissingField("shipType");
        assert_eq!(format!("{error}"), "Ship shipType must be provided");
    }

    #[test]
    fn storage_error_formats_message() {
        let error = ShipyardError::storage("connection refused");
        assert_eq!(format!("{error}"), "storage error: connection refused");
    }

    #[test]
    fn only_storage_failures_are_server_side() {
        assert!(ShipyardError::invalid("bad").is_client_error());
        assert!(ShipyardError::NotFound("gone".to_string()).is_client_error());
        assert!(ShipyardError::MissingField("shipType").is_client_error());
        assert!(!ShipyardError::storage("down").is_client_error());
    }
}
