//! [`Booking`]-related HTTP API definitions.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query,
    },
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{self, booking, room},
    query, Command as _,
};

use crate::{api, AsError as _, Error, Service};

/// `Booking` representation in the HTTP API.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub booking_id: booking::Id,

    /// First day of this [`Booking`].
    pub date_start: booking::StartDate,

    /// Last day of this [`Booking`].
    pub date_end: booking::EndDate,

    /// ID of the booked room.
    pub room: room::Id,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        Self {
            booking_id: booking.id,
            date_start: booking.start_date,
            date_end: booking.end_date,
            room: booking.room_id,
        }
    }
}

/// Form of a [`create()`] request.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateForm {
    /// ID of the room to book.
    pub room_id: Option<u64>,

    /// First day of a new [`Booking`] in the `YYYY-MM-DD` format.
    pub date_start: Option<String>,

    /// Last day of a new [`Booking`] in the `YYYY-MM-DD` format.
    pub date_end: Option<String>,
}

/// Creates a new [`Booking`].
///
/// # Errors
///
/// - `101` if any of the dates is not a `YYYY-MM-DD` date;
/// - `102` if the form is malformed or misses a required field;
/// - `103` if the room doesn't exist;
/// - `105` if the last day is before the first one.
#[tracing::instrument(skip_all, fields(api.name = "createBooking"))]
pub async fn create(
    Extension(service): Extension<Service>,
    form: Result<Form<CreateForm>, FormRejection>,
) -> Result<Json<api::Envelope<api::Created<booking::Id>>>, Error> {
    let Form(CreateForm {
        room_id,
        date_start,
        date_end,
    }) = form.map_err(|e| e.into_error())?;
    let room_id = room_id
        .filter(|id| *id != 0)
        .ok_or_else(|| Error::bad_request(&"`room_id` is required"))?;
    let start_date = date_start
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::bad_request(&"`date_start` is required"))?;
    let end_date = date_end
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::bad_request(&"`date_end` is required"))?;

    let booking = service
        .execute(command::CreateBooking {
            room_id: room_id.into(),
            start_date,
            end_date,
        })
        .await
        .map_err(|e| e.into_error())?;

    Ok(Json(api::Envelope::body(api::Created { id: booking.id })))
}

/// Query parameters of a [`list()`] request.
#[derive(Clone, Debug, Deserialize)]
pub struct ListParams {
    /// ID of the room to list [`Booking`]s of.
    pub room_id: Option<String>,
}

/// Body of a [`list()`] response.
#[derive(Clone, Debug, Serialize)]
pub struct List {
    /// Listed [`Booking`]s.
    pub bookings: Vec<Booking>,
}

/// Lists all [`Booking`]s of a room ordered by their first day.
///
/// # Errors
///
/// - `101` if the room ID is absent or is not an unsigned integer;
/// - `102` if the query is malformed;
/// - `103` if the room doesn't exist.
#[tracing::instrument(skip_all, fields(api.name = "listBookings"))]
pub async fn list(
    Extension(service): Extension<Service>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<api::Envelope<List>>, Error> {
    let Query(ListParams { room_id }) = params.map_err(|e| e.into_error())?;
    let room_id = room_id
        .unwrap_or_default()
        .parse::<room::Id>()
        .map_err(|e| e.into_error())?;

    let bookings = service
        .execute(query::bookings::ByRoom(room_id))
        .await
        .map_err(|e| e.into_error())?;

    Ok(Json(api::Envelope::body(List {
        bookings: bookings.into_iter().map(Into::into).collect(),
    })))
}

/// Deletes a [`Booking`].
///
/// # Errors
///
/// - `101` if the ID is not an unsigned integer;
/// - `104` if the [`Booking`] doesn't exist.
#[tracing::instrument(
    skip_all,
    fields(api.name = "deleteBooking", booking_id = %id),
)]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<api::Envelope<()>>, Error> {
    let booking_id =
        id.parse::<booking::Id>().map_err(|e| e.into_error())?;

    service
        .execute(command::DeleteBooking { booking_id })
        .await
        .map_err(|e| e.into_error())?;

    Ok(Json(api::Envelope::message(api::DELETED_MESSAGE)))
}

#[cfg(test)]
mod spec {
    use axum::Router;
    use serde_json::json;

    use crate::api::test::{app, delete, get, post_form, send};

    async fn create_room(app: &Router) {
        let (status, _) = send(
            app,
            post_form("/rooms/create", "description=double&price=1000"),
        )
        .await;
        assert_eq!(status, http::StatusCode::OK);
    }

    #[tokio::test]
    async fn creates_booking() {
        let (app, _) = app();
        create_room(&app).await;

        let (status, body) = send(
            &app,
            post_form(
                "/bookings/create",
                "room_id=1&date_start=2024-01-10&date_end=2024-01-12",
            ),
        )
        .await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, json!({"body": {"id": 1}}));
    }

    #[tokio::test]
    async fn accepts_single_day_booking() {
        let (app, _) = app();
        create_room(&app).await;

        let (status, _) = send(
            &app,
            post_form(
                "/bookings/create",
                "room_id=1&date_start=2024-01-10&date_end=2024-01-10",
            ),
        )
        .await;

        assert_eq!(status, http::StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let (app, _) = app();
        create_room(&app).await;

        for form in [
            "date_start=2024-01-10&date_end=2024-01-12",
            "room_id=0&date_start=2024-01-10&date_end=2024-01-12",
            "room_id=1&date_end=2024-01-12",
            "room_id=1&date_start=&date_end=2024-01-12",
            "room_id=1&date_start=2024-01-10",
            "room_id=first&date_start=2024-01-10&date_end=2024-01-12",
        ] {
            let (status, body) =
                send(&app, post_form("/bookings/create", form)).await;

            assert_eq!(status, http::StatusCode::BAD_REQUEST, "form: {form}");
            assert_eq!(body["error"]["code"], 102, "form: {form}");
        }
    }

    #[tokio::test]
    async fn rejects_reversed_dates() {
        let (app, _) = app();
        create_room(&app).await;

        let (status, body) = send(
            &app,
            post_form(
                "/bookings/create",
                "room_id=1&date_start=2024-01-12&date_end=2024-01-10",
            ),
        )
        .await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": {
                "code": 105,
                "message": "end date is earlier than start date",
                "user_message": "Дата окончания раньше даты начала",
            }}),
        );
    }

    #[tokio::test]
    async fn unparsable_date_is_internal_error() {
        let (app, _) = app();
        create_room(&app).await;

        let (status, body) = send(
            &app,
            post_form(
                "/bookings/create",
                "room_id=1&date_start=10.01.2024&date_end=2024-01-12",
            ),
        )
        .await;

        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], 101);
    }

    #[tokio::test]
    async fn rejects_booking_of_absent_room() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            post_form(
                "/bookings/create",
                "room_id=7&date_start=2024-01-10&date_end=2024-01-12",
            ),
        )
        .await;

        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 103);
    }

    #[tokio::test]
    async fn lists_bookings_by_start_date() {
        let (app, _) = app();
        create_room(&app).await;
        for form in [
            "room_id=1&date_start=2024-03-01&date_end=2024-03-05",
            "room_id=1&date_start=2024-01-01&date_end=2024-01-02",
        ] {
            let (status, _) =
                send(&app, post_form("/bookings/create", form)).await;
            assert_eq!(status, http::StatusCode::OK);
        }

        let (status, body) = send(&app, get("/bookings/list?room_id=1")).await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(
            body,
            json!({"body": {"bookings": [
                {
                    "booking_id": 2,
                    "date_start": "2024-01-01",
                    "date_end": "2024-01-02",
                    "room": 1,
                },
                {
                    "booking_id": 1,
                    "date_start": "2024-03-01",
                    "date_end": "2024-03-05",
                    "room": 1,
                },
            ]}}),
        );
    }

    #[tokio::test]
    async fn lists_no_bookings() {
        let (app, _) = app();
        create_room(&app).await;

        let (status, body) = send(&app, get("/bookings/list?room_id=1")).await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, json!({"body": {"bookings": []}}));
    }

    #[tokio::test]
    async fn listing_requires_existing_room() {
        let (app, _) = app();

        let (status, body) = send(&app, get("/bookings/list?room_id=3")).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 103);

        for uri in ["/bookings/list", "/bookings/list?room_id=abc"] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(
                status,
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "uri: {uri}",
            );
            assert_eq!(body["error"]["code"], 101, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn deletes_booking() {
        let (app, _) = app();
        create_room(&app).await;
        _ = send(
            &app,
            post_form(
                "/bookings/create",
                "room_id=1&date_start=2024-01-10&date_end=2024-01-12",
            ),
        )
        .await;

        let (status, body) = send(&app, delete("/bookings/1")).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, json!({"message": "successfully deleted"}));

        let (status, body) = send(&app, delete("/bookings/1")).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 104);

        let (status, body) = send(&app, delete("/bookings/one")).await;
        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], 101);
    }

    #[tokio::test]
    async fn room_deletion_removes_its_bookings() {
        let (app, _) = app();
        create_room(&app).await;
        _ = send(
            &app,
            post_form(
                "/bookings/create",
                "room_id=1&date_start=2024-01-10&date_end=2024-01-12",
            ),
        )
        .await;

        let (status, _) = send(&app, delete("/rooms/1")).await;
        assert_eq!(status, http::StatusCode::OK);

        let (status, body) = send(&app, delete("/bookings/1")).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 104);

        let (status, body) = send(&app, get("/bookings/list?room_id=1")).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 103);
    }
}
