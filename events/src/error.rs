//! Error types for the `events` crate.
//!
//! Follows the same pattern as the rest of the workspace: a root Error struct
//! holding an error kind tree and an optional source for chaining.

use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type for event construction and rendering.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in the event layer.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// Raised synchronously while building an event. Never retried.
    Validation(ValidationErrorKind),
    /// Raised while rendering an event that was already built.
    Render(RenderErrorKind),
}

/// Errors from event construction.
#[derive(Debug, PartialEq)]
pub enum ValidationErrorKind {
    MissingField(&'static str),
    EmptyField(&'static str),
    InvalidFrequency,
    UnknownKind(String),
}

/// Errors from rendering an event to its wire text.
#[derive(Debug, PartialEq)]
pub enum RenderErrorKind {
    /// A caller-supplied generator failed. Holds the field it was backing.
    Generator(&'static str),
    Serialization,
}

impl Error {
    pub fn missing_field(field: &'static str) -> Self {
        Self::validation(ValidationErrorKind::MissingField(field))
    }

    pub fn empty_field(field: &'static str) -> Self {
        Self::validation(ValidationErrorKind::EmptyField(field))
    }

    pub fn validation(kind: ValidationErrorKind) -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::Validation(kind),
        }
    }

    pub fn generator(field: &'static str, source: Box<dyn StdError + Send + Sync>) -> Self {
        Error {
            source: Some(source),
            error_kind: ErrorKind::Render(RenderErrorKind::Generator(field)),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.error_kind, ErrorKind::Validation(_))
    }

    pub fn is_render(&self) -> bool {
        matches!(self.error_kind, ErrorKind::Render(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Validation(kind) => match kind {
                ValidationErrorKind::MissingField(field) => {
                    write!(f, "Missing required field: {field}")
                }
                ValidationErrorKind::EmptyField(field) => {
                    write!(f, "Required field must not be empty: {field}")
                }
                ValidationErrorKind::InvalidFrequency => {
                    write!(f, "Repeat frequency must be a positive number of milliseconds")
                }
                ValidationErrorKind::UnknownKind(kind) => write!(f, "Unknown event kind: {kind}"),
            },
            ErrorKind::Render(kind) => match kind {
                RenderErrorKind::Generator(field) => {
                    write!(f, "Generator for field {field} failed")?;
                    if let Some(source) = &self.source {
                        write!(f, ": {source}")?;
                    }
                    Ok(())
                }
                RenderErrorKind::Serialization => write!(f, "Failed to serialize event field"),
            },
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Render(RenderErrorKind::Serialization),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_the_field() {
        let err = Error::missing_field("selector");
        assert_eq!(err.to_string(), "Missing required field: selector");
        assert_eq!(
            err.error_kind,
            ErrorKind::Validation(ValidationErrorKind::MissingField("selector"))
        );
        assert!(err.is_validation());
        assert!(!err.is_render());
    }

    #[test]
    fn test_generator_error_keeps_source() {
        let err = Error::generator("fragment", "clock unavailable".into());
        assert!(err.is_render());
        assert_eq!(
            err.to_string(),
            "Generator for field fragment failed: clock unavailable"
        );
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_serde_json_error_maps_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(
            err.error_kind,
            ErrorKind::Render(RenderErrorKind::Serialization)
        );
    }
}
