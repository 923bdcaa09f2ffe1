//! [`Room`]-related HTTP API definitions.

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
    domain::{self, room},
    query,
    read::room::list::Sort,
    Command as _,
};

use crate::{api, AsError as _, Error, Service};

/// `Room` representation in the HTTP API.
#[derive(Clone, Debug, Serialize)]
pub struct Room {
    /// ID of this [`Room`].
    pub room_id: room::Id,

    /// Description of this [`Room`].
    pub description: String,

    /// Price of this [`Room`].
    pub price: u64,

    /// Creation time of this [`Room`] in RFC 3339 format.
    pub created: room::CreationDateTime,
}

impl From<domain::Room> for Room {
    fn from(room: domain::Room) -> Self {
        Self {
            room_id: room.id,
            description: room.description.into(),
            price: room.price.into(),
            created: room.created_at,
        }
    }
}

/// Form of a [`create()`] request.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateForm {
    /// Description of a new [`Room`].
    pub description: Option<String>,

    /// Price of a new [`Room`].
    pub price: Option<u64>,
}

/// Creates a new [`Room`].
///
/// # Errors
///
/// - `102` if the form is malformed, or the description is empty, or the
///   price is zero.
#[tracing::instrument(skip_all, fields(api.name = "createRoom"))]
pub async fn create(
    Extension(service): Extension<Service>,
    form: Result<Form<CreateForm>, FormRejection>,
) -> Result<Json<api::Envelope<api::Created<room::Id>>>, Error> {
    let Form(CreateForm { description, price }) =
        form.map_err(|e| e.into_error())?;
    let description = description
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::bad_request(&"`description` is required"))?;
    let price = price
        .filter(|p| *p != 0)
        .ok_or_else(|| Error::bad_request(&"`price` is required"))?;

    let room = service
        .execute(command::CreateRoom {
            description: room::Description::new(description),
            price: price.into(),
        })
        .await
        .map_err(|e| e.into_error())?;

    Ok(Json(api::Envelope::body(api::Created { id: room.id })))
}

/// Query parameters of a [`list()`] request.
#[derive(Clone, Debug, Deserialize)]
pub struct ListParams {
    /// Key to order [`Room`]s by.
    ///
    /// `created` if absent.
    pub order_by: Option<String>,

    /// Indicator whether to order [`Room`]s descending.
    #[serde(default)]
    pub desc: bool,
}

/// Body of a [`list()`] response.
#[derive(Clone, Debug, Serialize)]
pub struct List {
    /// Listed [`Room`]s.
    pub rooms: Vec<Room>,
}

/// Lists all [`Room`]s.
///
/// Unknown `order_by` keys result in the insertion order.
///
/// # Errors
///
/// - `102` if the query is malformed.
#[tracing::instrument(skip_all, fields(api.name = "listRooms"))]
pub async fn list(
    Extension(service): Extension<Service>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<api::Envelope<List>>, Error> {
    let Query(ListParams { order_by, desc }) =
        params.map_err(|e| e.into_error())?;
    let order_by = order_by
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| "created".to_owned());

    let rooms = service
        .execute(query::rooms::List::by(Sort::new(&order_by, desc)))
        .await
        .map_err(|e| e.into_error())?;

    Ok(Json(api::Envelope::body(List {
        rooms: rooms.into_iter().map(Into::into).collect(),
    })))
}

/// Deletes a [`Room`] along with all its bookings.
///
/// # Errors
///
/// - `101` if the ID is not an unsigned integer;
/// - `103` if the [`Room`] doesn't exist.
#[tracing::instrument(skip_all, fields(api.name = "deleteRoom", room_id = %id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<api::Envelope<()>>, Error> {
    let room_id = id.parse::<room::Id>().map_err(|e| e.into_error())?;

    service
        .execute(command::DeleteRoom { room_id })
        .await
        .map_err(|e| e.into_error())?;

    Ok(Json(api::Envelope::message(api::DELETED_MESSAGE)))
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::api::test::{app, delete, get, post_form, send};

    #[tokio::test]
    async fn creates_room() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            post_form("/rooms/create", "description=sea+view&price=500"),
        )
        .await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, json!({"body": {"id": 1}}));
    }

    #[tokio::test]
    async fn rejects_missing_fields() {
        let (app, _) = app();

        for form in [
            "price=500",
            "description=&price=500",
            "description=attic",
            "description=attic&price=0",
            "description=attic&price=cheap",
        ] {
            let (status, body) =
                send(&app, post_form("/rooms/create", form)).await;

            assert_eq!(status, http::StatusCode::BAD_REQUEST, "form: {form}");
            assert_eq!(body["error"]["code"], 102, "form: {form}");
        }
    }

    #[tokio::test]
    async fn lists_rooms() {
        let (app, _) = app();
        for form in [
            "description=first&price=300",
            "description=second&price=100",
            "description=third&price=200",
        ] {
            _ = send(&app, post_form("/rooms/create", form)).await;
        }

        let (status, body) =
            send(&app, get("/rooms/list?order_by=price&desc=true")).await;

        assert_eq!(status, http::StatusCode::OK);
        let rooms = body["body"]["rooms"].as_array().unwrap();
        let prices = rooms.iter().map(|r| r["price"].clone()).collect::<Vec<_>>();
        assert_eq!(prices, [json!(300), json!(200), json!(100)]);
        assert_eq!(rooms[0]["room_id"], 1);
        assert_eq!(rooms[0]["description"], "first");
        assert!(rooms[0]["created"].is_string());
    }

    #[tokio::test]
    async fn lists_no_rooms() {
        let (app, _) = app();

        let (status, body) = send(&app, get("/rooms/list")).await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, json!({"body": {"rooms": []}}));
    }

    #[tokio::test]
    async fn rejects_malformed_list_query() {
        let (app, _) = app();

        let (status, body) = send(&app, get("/rooms/list?desc=maybe")).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 102);
    }

    #[tokio::test]
    async fn deletes_room() {
        let (app, _) = app();
        _ = send(&app, post_form("/rooms/create", "description=a&price=1"))
            .await;

        let (status, body) = send(&app, delete("/rooms/1")).await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, json!({"message": "successfully deleted"}));

        let (status, body) = send(&app, delete("/rooms/1")).await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"error": {
                "code": 103,
                "message": "room with this id doesn't exist",
                "user_message": "Комнаты с таким ID не существует",
            }}),
        );
    }

    #[tokio::test]
    async fn unparsable_id_is_internal_error() {
        let (app, _) = app();

        let (status, body) = send(&app, delete("/rooms/first")).await;

        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], 101);
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let (app, db) = app();
        db.set_offline(true);

        let (status, body) = send(&app, get("/rooms/list")).await;

        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], 101);
        assert_eq!(body["error"]["user_message"], "Что-то пошло не так");
    }
}
