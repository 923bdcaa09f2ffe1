//! [`Command`] for creating a new [`Booking`].

use common::{
    catalog::{self, AsEntry},
    date,
    operations::{By, Commit, Insert, Select, Transact, Transacted},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, room, Booking, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Booking`] of a [`Room`].
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// ID of the [`Room`] to book.
    pub room_id: room::Id,

    /// First day of a new [`Booking`] in the `YYYY-MM-DD` format.
    pub start_date: String,

    /// Last day of a new [`Booking`] in the `YYYY-MM-DD` format.
    pub end_date: String,
}

impl<Db> Command<CreateBooking> for Service<Db>
where
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Booking>,
            Ok = booking::Id,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            room_id,
            start_date,
            end_date,
        } = cmd;

        let start_date = booking::StartDate::parse(&start_date)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let end_date = booking::EndDate::parse(&end_date)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if end_date.is_before(&start_date) {
            return Err(tracerr::new!(E::IncorrectDates {
                start: start_date,
                end: end_date,
            }));
        }

        _ = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::RoomNotExists(room_id)))?;

        let mut booking = Booking {
            id: booking::Id::UNASSIGNED,
            room_id,
            start_date,
            end_date,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // The `Room` may be deleted after the check above.
        booking.id = tx
            .execute(Insert(booking))
            .await
            .map_err(|e| {
                if e.as_ref().is_foreign_key_violation() {
                    log::warn!("`Room(id: {room_id})` deleted concurrently");
                    tracerr::new!(E::RoomNotExists(room_id))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map_err(tracerr::wrap!())?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Provided date is not a valid `YYYY-MM-DD` date.
    #[display("Failed to parse date: {_0}")]
    #[from]
    DateParse(date::ParseError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Last day of a [`Booking`] is before its first day.
    #[display("end date {end} is earlier than start date {start}")]
    IncorrectDates {
        /// Provided first day.
        start: booking::StartDate,

        /// Provided last day.
        end: booking::EndDate,
    },

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

impl AsEntry for ExecutionError {
    fn as_entry(&self) -> catalog::Entry {
        match self {
            Self::DateParse(_) => catalog::Code::InternalError.wrap(self),
            Self::Db(e) => e.as_entry(),
            Self::IncorrectDates { .. } => {
                catalog::Code::IncorrectDates.entry()
            }
            Self::RoomNotExists(_) => catalog::Code::RoomNotExists.entry(),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{
        catalog::{self, AsEntry as _},
        operations::{By, Delete, Insert, Select, Transact},
    };
    use tracerr::Traced;

    use crate::{
        domain::{room, Booking, Room},
        infra::{database, Database, Memory},
        Service,
    };

    use super::CreateBooking;

    /// [`Memory`] database losing every [`Room`] right after selecting it.
    #[derive(Clone, Debug)]
    struct Racing(Memory);

    impl Database<Select<By<Option<Room>, room::Id>>> for Racing {
        type Ok = Option<Room>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            select: Select<By<Option<Room>, room::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let room =
                self.0.execute(select).await.map_err(tracerr::wrap!())?;
            if let Some(room) = &room {
                self.0
                    .execute(Delete(By::<Room, _>::new(room.id)))
                    .await
                    .map_err(tracerr::wrap!())?;
            }
            Ok(room)
        }
    }

    impl Database<Transact> for Racing {
        type Ok = Memory;
        type Err = Traced<database::Error>;

        async fn execute(&self, tx: Transact) -> Result<Self::Ok, Self::Err> {
            self.0.execute(tx).await.map_err(tracerr::wrap!())
        }
    }

    async fn insert_room(db: &Memory) -> room::Id {
        db.execute(Insert(Room {
            id: room::Id::UNASSIGNED,
            description: room::Description::new("double"),
            price: 500_u64.into(),
            created_at: room::CreationDateTime::now(),
        }))
        .await
        .unwrap()
    }

    fn cmd(room_id: room::Id, start: &str, end: &str) -> CreateBooking {
        CreateBooking {
            room_id,
            start_date: start.into(),
            end_date: end.into(),
        }
    }

    #[tokio::test]
    async fn creates_booking() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;
        let service = Service::new(db.clone());

        let booking = service
            .execute(cmd(room_id, "2021-01-08", "2021-01-10"))
            .await
            .unwrap();

        assert!(booking.id.is_assigned());
        assert_eq!(booking.room_id, room_id);
        assert_eq!(booking.start_date.to_string(), "2021-01-08");
        assert_eq!(booking.end_date.to_string(), "2021-01-10");
        let stored = db
            .execute(Select(By::<Option<Booking>, _>::new(booking.id)))
            .await
            .unwrap();
        assert_eq!(stored, Some(booking));
    }

    #[tokio::test]
    async fn allows_single_day_bookings() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;

        let booking = Service::new(db)
            .execute(cmd(room_id, "2021-01-08", "2021-01-08"))
            .await
            .unwrap();

        assert_eq!(booking.start_date.to_string(), "2021-01-08");
    }

    #[tokio::test]
    async fn rejects_reversed_dates_regardless_of_room() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;
        let service = Service::new(db);

        for room_id in [room_id, room::Id::new(room_id.get() + 100)] {
            let err = service
                .execute(cmd(room_id, "2022-01-02", "2021-01-02"))
                .await
                .unwrap_err();

            assert_eq!(
                err.as_ref().as_entry(),
                catalog::Code::IncorrectDates.entry(),
            );
        }
    }

    #[tokio::test]
    async fn fails_on_missing_room() {
        let service = Service::new(Memory::new());

        let err = service
            .execute(cmd(room::Id::new(7), "2021-01-08", "2021-01-10"))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry(),
            catalog::Code::RoomNotExists.entry(),
        );
    }

    #[tokio::test]
    async fn room_deleted_before_insert_is_missing_room() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;

        let err = Service::new(Racing(db.clone()))
            .execute(cmd(room_id, "2021-01-08", "2021-01-10"))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry(),
            catalog::Code::RoomNotExists.entry(),
        );
        let bookings = db
            .execute(Select(By::<Vec<Booking>, _>::new(room_id)))
            .await
            .unwrap();
        assert!(bookings.is_empty());
    }

    #[tokio::test]
    async fn malformed_date_is_internal_error() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;

        let err = Service::new(db)
            .execute(cmd(room_id, "08.01.2021", "2021-01-10"))
            .await
            .unwrap_err();

        let entry = err.as_ref().as_entry();
        assert_eq!(entry.code, catalog::Code::InternalError.code());
        assert_ne!(entry.message, catalog::Code::InternalError.entry().message);
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let db = Memory::new();
        let room_id = insert_room(&db).await;
        db.set_offline(true);

        let err = Service::new(db)
            .execute(cmd(room_id, "2021-01-08", "2021-01-10"))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref().as_entry().code,
            catalog::Code::InternalError.code(),
        );
    }
}
