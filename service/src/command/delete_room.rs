//! [`Command`] for deleting a [`Room`] along with its [`Booking`]s.

use common::{
    catalog::{self, AsEntry},
    operations::{By, Commit, Delete, Select, Transact, Transacted},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Booking;
use crate::{
    domain::{room, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Room`] along with its [`Booking`]s.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRoom {
    /// ID of the [`Room`] to delete.
    pub room_id: room::Id,
}

impl<Db> Command<DeleteRoom> for Service<Db>
where
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Delete<By<Room, room::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteRoom) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRoom { room_id } = cmd;

        _ = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::RoomNotExists(room_id)))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Delete(By::<Room, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)
    }
}

/// Error of [`DeleteRoom`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

impl AsEntry for ExecutionError {
    fn as_entry(&self) -> catalog::Entry {
        match self {
            Self::Db(e) => e.as_entry(),
            Self::RoomNotExists(_) => catalog::Code::RoomNotExists.entry(),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{
        catalog::{self, AsEntry as _},
        operations::{By, Insert, Select},
    };

    use crate::{
        domain::{booking, room, Booking, Room},
        infra::Memory,
        Command as _, Service,
    };

    use super::DeleteRoom;

    async fn insert_room(db: &Memory) -> room::Id {
        db.execute(Insert(Room {
            id: room::Id::UNASSIGNED,
            description: room::Description::new("attic"),
            price: 100_u64.into(),
            created_at: room::CreationDateTime::now(),
        }))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn deletes_room_with_bookings() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;
        let booking_id = db
            .execute(Insert(Booking {
                id: booking::Id::UNASSIGNED,
                room_id,
                start_date: booking::StartDate::parse("2021-01-08").unwrap(),
                end_date: booking::EndDate::parse("2021-01-10").unwrap(),
            }))
            .await
            .unwrap();
        let service = Service::new(db.clone());

        service.execute(DeleteRoom { room_id }).await.unwrap();

        let room = db
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .unwrap();
        assert_eq!(room, None);
        let booking = db
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .unwrap();
        assert_eq!(booking, None);
    }

    #[tokio::test]
    async fn fails_on_missing_room() {
        let db = Memory::new();
        let existing = insert_room(&db).await;
        let service = Service::new(db.clone());

        let err = service
            .execute(DeleteRoom {
                room_id: room::Id::new(existing.get() + 1),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry(),
            catalog::Code::RoomNotExists.entry(),
        );
        let room = db
            .execute(Select(By::<Option<Room>, _>::new(existing)))
            .await
            .unwrap();
        assert!(room.is_some());
    }

    #[tokio::test]
    async fn second_deletion_fails() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;
        let service = Service::new(db);

        service.execute(DeleteRoom { room_id }).await.unwrap();
        let err = service.execute(DeleteRoom { room_id }).await.unwrap_err();

        assert_eq!(
            err.as_ref().as_entry().code,
            catalog::Code::RoomNotExists.code(),
        );
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;
        db.set_offline(true);

        let err = Service::new(db)
            .execute(DeleteRoom { room_id })
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry().status,
            catalog::Code::InternalError.entry().status,
        );
    }
}
