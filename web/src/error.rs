use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use events::error::{Error as EventError, ErrorKind as EventErrorKind};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

/// Failure before a stream starts. No partial stream output is ever sent:
/// the client gets a plain status response instead.
#[derive(Debug)]
pub struct Error(EventError);

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.0)
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self.0.error_kind {
            EventErrorKind::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EventErrorKind::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!("Refusing to start event stream ({status}): {}", self.0);

        match status {
            StatusCode::UNPROCESSABLE_ENTITY => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response(),
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<EventError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
