//! HTTP API definitions.

pub mod booking;
pub mod room;

use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use common::catalog;
use serde::Serialize;

use crate::Service;

/// Message of a successful deletion.
pub const DELETED_MESSAGE: &str = "successfully deleted";

/// Envelope every HTTP API response is wrapped into.
#[derive(Clone, Debug, Serialize)]
pub struct Envelope<T> {
    /// Error occurred while processing the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<catalog::Entry>,

    /// Human-readable outcome of the request, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,

    /// Payload of the response, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
}

impl<T> Envelope<T> {
    /// Wraps the provided `body` into an [`Envelope`].
    #[must_use]
    pub const fn body(body: T) -> Self {
        Self {
            error: None,
            message: None,
            body: Some(body),
        }
    }

    /// Wraps the provided `message` into an [`Envelope`].
    #[must_use]
    pub const fn message(message: &'static str) -> Self {
        Self {
            error: None,
            message: Some(message),
            body: None,
        }
    }

    /// Wraps the provided error [`catalog::Entry`] into an [`Envelope`].
    #[must_use]
    pub const fn error(entry: catalog::Entry) -> Self {
        Self {
            error: Some(entry),
            message: None,
            body: None,
        }
    }
}

/// Body of a response to a creation request.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Created<Id> {
    /// ID of the created entity.
    pub id: Id,
}

/// Creates a new [`Router`] serving the HTTP API on top of the provided
/// [`Service`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/rooms/create", post(room::create))
        .route("/rooms/list", get(room::list))
        .route("/rooms/:id", delete(room::delete))
        .route("/bookings/create", post(booking::create))
        .route("/bookings/list", get(booking::list))
        .route("/bookings/:id", delete(booking::delete))
        .layer(Extension(service))
}
