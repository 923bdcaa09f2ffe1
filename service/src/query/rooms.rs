//! [`Query`] collection related to multiple [`Room`]s.

use common::operations::By;

use crate::{domain::Room, read::room::list::Sort};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Room`]s ordered by the provided [`Sort`].
pub type List = DatabaseQuery<By<Vec<Room>, Sort>>;

#[cfg(test)]
mod spec {
    use common::{
        catalog::{self, AsEntry as _},
        operations::Insert,
        DateTime,
    };

    use crate::{
        domain::{room, Room},
        infra::Memory,
        read::room::list::Sort,
        Query as _, Service,
    };

    use super::List;

    /// Inserts [`Room`]s with the provided prices and creation times, in the
    /// provided order.
    async fn service(
        rooms: &[(u64, &str)],
    ) -> (Service<Memory>, Vec<room::Id>) {
        let db = Memory::new();
        let mut ids = vec![];
        for (price, created) in rooms {
            ids.push(
                db.execute(Insert(Room {
                    id: room::Id::UNASSIGNED,
                    description: room::Description::new(format!("room for {price}")),
                    price: (*price).into(),
                    created_at: DateTime::from_rfc3339(created)
                        .unwrap()
                        .coerce(),
                }))
                .await
                .unwrap(),
            );
        }
        (Service::new(db), ids)
    }

    async fn list(
        svc: &Service<Memory>,
        key: &str,
        desc: bool,
    ) -> Vec<room::Id> {
        svc.execute(List::by(Sort::new(key, desc)))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[tokio::test]
    async fn sorts_by_price() {
        let (svc, ids) = service(&[
            (300, "2021-01-01T00:00:00Z"),
            (100, "2021-01-02T00:00:00Z"),
            (200, "2021-01-03T00:00:00Z"),
        ])
        .await;

        assert_eq!(list(&svc, "price", false).await, [ids[1], ids[2], ids[0]]);
        assert_eq!(list(&svc, "price", true).await, [ids[0], ids[2], ids[1]]);
    }

    #[tokio::test]
    async fn sorts_by_creation_time() {
        let (svc, ids) = service(&[
            (100, "2021-01-03T00:00:00Z"),
            (200, "2021-01-01T00:00:00Z"),
            (300, "2021-01-02T00:00:00Z"),
        ])
        .await;

        assert_eq!(
            list(&svc, "created", false).await,
            [ids[1], ids[2], ids[0]],
        );
        assert_eq!(list(&svc, "created", true).await, [ids[0], ids[2], ids[1]]);
    }

    #[tokio::test]
    async fn unknown_key_keeps_insertion_order() {
        let (svc, ids) = service(&[
            (300, "2021-01-03T00:00:00Z"),
            (100, "2021-01-01T00:00:00Z"),
            (200, "2021-01-02T00:00:00Z"),
        ])
        .await;

        assert_eq!(list(&svc, "rating", false).await, ids);
        assert_eq!(list(&svc, "rating", true).await, ids);
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let (svc, _) = service(&[]).await;

        assert!(list(&svc, "created", false).await.is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let (svc, _) = service(&[(100, "2021-01-01T00:00:00Z")]).await;
        svc.database().set_offline(true);

        let err = svc
            .execute(List::by(Sort::default()))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry().code,
            catalog::Code::InternalError.code(),
        );
    }
}
