//! In-memory [`Database`] implementation.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::{
        atomic::{self, AtomicBool},
        Arc,
    },
};

use common::operations::{By, Commit, Delete, Insert, Select, Transact};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{booking, room, Booking, Room},
    infra::{database, Database},
    read::room::list::{Sort, SortKey},
};

/// In-memory [`Database`] client.
///
/// Clones share the same storage. There is no isolation between transactions:
/// every write is visible immediately and [`Commit`] does nothing.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared storage.
    storage: Arc<RwLock<Storage>>,

    /// Indicator whether every operation should fail.
    offline: Arc<AtomicBool>,
}

/// Storage of a [`Memory`] database.
#[derive(Debug, Default)]
struct Storage {
    /// Stored [`Room`]s in the insertion order.
    rooms: BTreeMap<room::Id, Room>,

    /// Stored [`Booking`]s in the insertion order.
    bookings: BTreeMap<booking::Id, Booking>,

    /// Last assigned [`room::Id`].
    last_room_id: u64,

    /// Last assigned [`booking::Id`].
    last_booking_id: u64,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches this [`Memory`] database offline (or back online).
    ///
    /// While offline, every operation fails with [`Error::Offline`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, atomic::Ordering::Relaxed);
    }

    /// Ensures this [`Memory`] database is online.
    fn ensure_online(&self) -> Result<(), Traced<database::Error>> {
        if self.offline.load(atomic::Ordering::Relaxed) {
            return Err(tracerr::new!(database::Error::from(Error::Offline)));
        }
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Memory`] database is switched offline.
    #[display("`Memory` database is offline")]
    Offline,

    /// Referenced [`Room`] doesn't exist.
    #[display("referenced `Room(id: {_0})` does not exist")]
    ForeignKeyViolation(#[error(not(source))] room::Id),
}

impl Error {
    /// Checks whether this is an [`Error::ForeignKeyViolation`].
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation(_))
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())
    }
}

impl Database<Insert<Room>> for Memory {
    type Ok = room::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut room): Insert<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        let mut storage = self.storage.write().await;
        storage.last_room_id += 1;
        room.id = room::Id::new(storage.last_room_id);
        let id = room.id;
        drop(storage.rooms.insert(id, room));
        Ok(id)
    }
}

impl Database<Select<By<Option<Room>, room::Id>>> for Memory {
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        Ok(self.storage.read().await.rooms.get(&by.into_inner()).cloned())
    }
}

impl Database<Select<By<Vec<Room>, Sort>>> for Memory {
    type Ok = Vec<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Room>, Sort>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        let Sort { key, descending } = by.into_inner();
        let mut rooms = self
            .storage
            .read()
            .await
            .rooms
            .values()
            .cloned()
            .collect::<Vec<_>>();

        if let Some(key) = key {
            let order = |o: Ordering| if descending { o.reverse() } else { o };
            rooms.sort_by(|a, b| {
                match key {
                    SortKey::Created => order(a.created_at.cmp(&b.created_at)),
                    SortKey::Price => order(a.price.cmp(&b.price)),
                }
                .then(a.id.cmp(&b.id))
            });
        }

        Ok(rooms)
    }
}

impl Database<Delete<By<Room, room::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        let id = by.into_inner();
        let mut storage = self.storage.write().await;
        drop(storage.rooms.remove(&id));
        storage.bookings.retain(|_, b| b.room_id != id);
        Ok(())
    }
}

impl Database<Insert<Booking>> for Memory {
    type Ok = booking::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        let mut storage = self.storage.write().await;
        if !storage.rooms.contains_key(&booking.room_id) {
            return Err(tracerr::new!(database::Error::from(
                Error::ForeignKeyViolation(booking.room_id)
            )));
        }

        storage.last_booking_id += 1;
        booking.id = booking::Id::new(storage.last_booking_id);
        let id = booking.id;
        drop(storage.bookings.insert(id, booking));
        Ok(id)
    }
}

impl Database<Select<By<Option<Booking>, booking::Id>>> for Memory {
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        Ok(self
            .storage
            .read()
            .await
            .bookings
            .get(&by.into_inner())
            .cloned())
    }
}

impl Database<Select<By<Vec<Booking>, room::Id>>> for Memory {
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        let room_id = by.into_inner();
        let mut bookings = self
            .storage
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.room_id == room_id)
            .cloned()
            .collect::<Vec<_>>();
        bookings.sort_by(|a, b| {
            a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id))
        });
        Ok(bookings)
    }
}

impl Database<Delete<By<Booking, booking::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_online().map_err(tracerr::wrap!())?;

        drop(self.storage.write().await.bookings.remove(&by.into_inner()));
        Ok(())
    }
}
