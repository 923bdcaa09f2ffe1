//! [`Query`] collection related to multiple [`Booking`]s.

use common::{
    catalog::{self, AsEntry},
    operations::{By, Select},
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, Booking, Room},
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries all [`Booking`]s of a [`Room`], ordered by their first day.
#[derive(Clone, Copy, Debug)]
pub struct ByRoom(pub room::Id);

impl<Db> Query<ByRoom> for Service<Db>
where
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Booking>, room::Id>>,
            Ok = Vec<Booking>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Booking>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        ByRoom(room_id): ByRoom,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        _ = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::RoomNotExists(room_id)))?;

        self.database()
            .execute(Select(By::<Vec<Booking>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ByRoom`] [`Query`] execution.
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
