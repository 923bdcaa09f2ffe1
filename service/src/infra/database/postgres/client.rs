//! Postgres database clients lazily acquiring their [`Connection`]s.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Implements [`Connection`] for a client by forwarding every call to the
/// [`Connection`] returned by its `connection()` method.
macro_rules! forward_connection {
    ($client:ty) => {
        impl Connection for $client {
            async fn query<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec<T>(
                &self,
                stmt: &T,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>>
            where
                T: ToStatement + ?Sized,
            {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(stmt, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}

/// Acquires a [`connection::NonTx`] from the provided [`connection::Pool`].
async fn acquire(
    pool: &connection::Pool,
) -> Result<connection::NonTx, Traced<database::Error>> {
    pool.get()
        .await
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Maps a read guard over an initialized slot into a guard over its value.
fn initialized<C>(guard: RwLockReadGuard<'_, Option<C>>) -> RwLockReadGuard<'_, C> {
    RwLockReadGuard::map(guard, |conn| {
        conn.as_ref()
            .expect("connection cannot be dropped while guard is alive")
    })
}

/// Non-transactional Postgres database client.
///
/// Holds a single pooled connection, acquired on first use and reused by
/// every subsequent statement.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] to acquire [`Connection`]s from.
    pub(crate) pool: connection::Pool,

    /// Acquired [`Connection`], if any.
    connection: Arc<RwLock<Option<connection::NonTx>>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client on top of the provided
    /// [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            connection: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the [`Connection`] of this [`NonTx`] client, acquiring it
    /// if needed.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        let connection = self.connection.read().await;
        if connection.is_some() {
            return Ok(initialized(connection));
        }
        drop(connection);

        let mut connection = self.connection.write().await;
        if connection.is_none() {
            *connection =
                Some(acquire(&self.pool).await.map_err(tracerr::wrap!())?);
        }
        Ok(initialized(connection.downgrade()))
    }

    /// Takes the [`Connection`] out of this [`NonTx`] client.
    ///
    /// The next statement executed via this [`NonTx`] client acquires a new
    /// [`Connection`].
    async fn take_connection(&self) -> Option<connection::NonTx> {
        self.connection.write().await.take()
    }
}

forward_connection!(NonTx);

/// Transactional Postgres database client.
///
/// The transaction is started on first use, reusing the [`Connection`] of
/// the [`NonTx`] client it was created from, if that one has any. A
/// transaction that is dropped without being committed is rolled back.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to acquire a [`Connection`] from.
    pool: connection::Pool,

    /// [`NonTx`] client to take a [`Connection`] from, until the
    /// transaction is started.
    origin: Arc<RwLock<Option<NonTx>>>,

    /// Started transaction, if any.
    tx: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client out of the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            origin: Arc::new(RwLock::new(Some(client))),
            tx: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the transactional [`Connection`] of this [`Tx`] client,
    /// starting the transaction if needed.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let tx = self.tx.read().await;
        if tx.is_some() {
            return Ok(initialized(tx));
        }
        drop(tx);

        let mut tx = self.tx.write().await;
        if tx.is_none() {
            let reused = match self.origin.write().await.take() {
                Some(client) => client.take_connection().await,
                None => None,
            };
            let conn = match reused {
                Some(conn) => conn,
                None => acquire(&self.pool).await.map_err(tracerr::wrap!())?,
            };
            *tx = Some(
                connection::Tx::from_non_tx(conn)
                    .await
                    .map_err(tracerr::wrap!())?,
            );
        }
        Ok(initialized(tx.downgrade()))
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Does nothing if no statement has been executed via this [`Tx`]
    /// client yet.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        match self.tx.write().await.take() {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

forward_connection!(Tx);
