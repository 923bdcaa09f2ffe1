//! [`Command`] for deleting a [`Booking`].

use common::{
    catalog::{self, AsEntry},
    operations::{By, Commit, Delete, Select, Transact, Transacted},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteBooking {
    /// ID of the [`Booking`] to delete.
    pub booking_id: booking::Id,
}

impl<Db> Command<DeleteBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Delete<By<Booking, booking::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteBooking { booking_id } = cmd;

        _ = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::BookingNotExists(booking_id)))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Delete(By::<Booking, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)
    }
}

/// Error of [`DeleteBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl AsEntry for ExecutionError {
    fn as_entry(&self) -> catalog::Entry {
        match self {
            Self::BookingNotExists(_) => {
                catalog::Code::BookingNotExists.entry()
            }
            Self::Db(e) => e.as_entry(),
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

    use super::DeleteBooking;

    async fn insert_booking(db: &Memory) -> booking::Id {
        let room_id = db
            .execute(Insert(Room {
                id: room::Id::UNASSIGNED,
                description: room::Description::new("suite"),
                price: 900_u64.into(),
                created_at: room::CreationDateTime::now(),
            }))
            .await
            .unwrap();
        db.execute(Insert(Booking {
            id: booking::Id::UNASSIGNED,
            room_id,
            start_date: booking::StartDate::parse("2021-01-08").unwrap(),
            end_date: booking::EndDate::parse("2021-01-10").unwrap(),
        }))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn deletes_booking() {
        let db = Memory::new();
        let booking_id = insert_booking(&db).await;

        Service::new(db.clone())
            .execute(DeleteBooking { booking_id })
            .await
            .unwrap();

        let stored = db
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .unwrap();
        assert_eq!(stored, None);
    }

    #[tokio::test]
    async fn second_deletion_fails() {
        let db = Memory::new();
        let booking_id = insert_booking(&db).await;
        let service = Service::new(db);

        service.execute(DeleteBooking { booking_id }).await.unwrap();
        let err = service
            .execute(DeleteBooking { booking_id })
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry(),
            catalog::Code::BookingNotExists.entry(),
        );
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let db = Memory::new();
        let booking_id = insert_booking(&db).await;
        db.set_offline(true);

        let err = Service::new(db)
            .execute(DeleteBooking { booking_id })
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry().code,
            catalog::Code::InternalError.code(),
        );
    }
}
