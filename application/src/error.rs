//! [`Error`]-related definitions.

use std::{fmt, num::ParseIntError};

use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use common::catalog::{self, AsEntry as _};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{command, infra::database, query};
use tracerr::{Trace, Traced};
use tracing as log;

use crate::api::Envelope;

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`catalog::Entry`] describing this [`Error`].
    pub entry: catalog::Entry,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,
}

impl Error {
    /// Creates a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl fmt::Display) -> Self {
        catalog::Code::InternalError.wrap(msg).into()
    }

    /// Creates a new [`Error`] representing malformed request data.
    #[must_use]
    pub fn bad_request(msg: &impl fmt::Display) -> Self {
        catalog::Code::BadRequest.wrap(msg).into()
    }

    /// Returns [`http::StatusCode`] of this [`Error`].
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(self.entry.status)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<catalog::Entry> for Error {
    fn from(entry: catalog::Entry) -> Self {
        Self {
            entry,
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { entry, backtrace } = self;

        write!(
            f,
            "{entry}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }

        (status, Json(Envelope::<()>::error(self.entry))).into_response()
    }
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

/// Implements [`AsError`] for errors classified by the errors catalog.
macro_rules! impl_as_error_via_catalog {
    ($($ty:ty),* $(,)?) => {$(
        impl AsError for $ty {
            fn try_as_error(&self) -> Option<Error> {
                Some(self.as_entry().into())
            }
        }
    )*};
}

impl_as_error_via_catalog!(
    command::delete_booking::ExecutionError,
    command::delete_room::ExecutionError,
    command::create_booking::ExecutionError,
    database::Error,
    query::bookings::ExecutionError,
);

impl AsError for FormRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for ParseIntError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}
