//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, room, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Converts the provided [`Row`] of the `bookings` table into a [`Booking`].
fn from_row(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        room_id: row.get("room"),
        start_date: row.get("date_start"),
        end_date: row.get("date_end"),
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = booking::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id: _,
            room_id,
            start_date,
            end_date,
        } = booking;

        // Missing `rooms` row fails with a foreign key violation.
        const SQL: &str = "\
            INSERT INTO bookings (date_start, date_end, room) \
            VALUES ($1::DATE, $2::DATE, $3::INT8) \
            RETURNING id";
        Ok(self
            .query_opt(SQL, &[&start_date, &end_date, &room_id])
            .await
            .map_err(tracerr::wrap!())?
            .expect("`INSERT ... RETURNING` always returns a row")
            .get("id"))
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, date_start, date_end, room \
            FROM bookings \
            WHERE id = $1::INT8";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Booking>, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let room_id: room::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, date_start, date_end, room \
            FROM bookings \
            WHERE room = $1::INT8 \
            ORDER BY date_start ASC, id ASC";
        self.query(SQL, &[&room_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Delete<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM bookings \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
