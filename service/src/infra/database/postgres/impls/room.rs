//! [`Room`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{room, Room},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::room::list::{Sort, SortKey},
};

/// Converts the provided [`Row`] of the `rooms` table into a [`Room`].
fn from_row(row: &Row) -> Room {
    Room {
        id: row.get("id"),
        description: row.get("description"),
        price: row.get("price"),
        created_at: row.get("created"),
    }
}

impl<C> Database<Insert<Room>> for Postgres<C>
where
    C: Connection,
{
    type Ok = room::Id;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        let Room {
            id: _,
            description,
            price,
            created_at,
        } = room;

        const SQL: &str = "\
            INSERT INTO rooms (description, price, created) \
            VALUES ($1::TEXT, $2::INT8, $3::TIMESTAMPTZ) \
            RETURNING id";
        Ok(self
            .query_opt(SQL, &[&description, &price, &created_at])
            .await
            .map_err(tracerr::wrap!())?
            .expect("`INSERT ... RETURNING` always returns a row")
            .get("id"))
    }
}

impl<C> Database<Select<By<Option<Room>, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: room::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, description, price, created \
            FROM rooms \
            WHERE id = $1::INT8";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Room>, Sort>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Room>, Sort>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Sort { key, descending } = by.into_inner();

        // Only fixed statements here, so no user input reaches `ORDER BY`.
        let sql = match (key, descending) {
            (None, _) => {
                "SELECT id, description, price, created \
                 FROM rooms \
                 ORDER BY id ASC"
            }
            (Some(SortKey::Created), false) => {
                "SELECT id, description, price, created \
                 FROM rooms \
                 ORDER BY created ASC, id ASC"
            }
            (Some(SortKey::Created), true) => {
                "SELECT id, description, price, created \
                 FROM rooms \
                 ORDER BY created DESC, id ASC"
            }
            (Some(SortKey::Price), false) => {
                "SELECT id, description, price, created \
                 FROM rooms \
                 ORDER BY price ASC, id ASC"
            }
            (Some(SortKey::Price), true) => {
                "SELECT id, description, price, created \
                 FROM rooms \
                 ORDER BY price DESC, id ASC"
            }
        };
        self.query(sql, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(from_row).collect())
    }
}

impl<C> Database<Delete<By<Room, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: room::Id = by.into_inner();

        // `bookings` of the room are removed by `ON DELETE CASCADE`.
        const SQL: &str = "\
            DELETE FROM rooms \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
