//! [`Command`] for creating a new [`Room`].

use common::operations::{Commit, Insert, Transact, Transacted};
use tracerr::Traced;

use crate::{
    domain::{room, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Room`].
#[derive(Clone, Debug)]
pub struct CreateRoom {
    /// [`room::Description`] of a new [`Room`].
    pub description: room::Description,

    /// [`room::Price`] of a new [`Room`].
    pub price: room::Price,
}

impl<Db> Command<CreateRoom> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Room>,
            Ok = room::Id,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRoom) -> Result<Self::Ok, Self::Err> {
        let CreateRoom { description, price } = cmd;

        let mut room = Room {
            id: room::Id::UNASSIGNED,
            description,
            price,
            created_at: room::CreationDateTime::now(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        room.id = tx
            .execute(Insert(room.clone()))
            .await
            .map_err(tracerr::wrap!())?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(room)
    }
}

/// Error of [`CreateRoom`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use common::{
        catalog::{self, AsEntry as _},
        operations::{By, Select},
    };

    use crate::{
        domain::{room, Room},
        infra::Memory,
        Command as _, Service,
    };

    use super::CreateRoom;

    fn cmd(price: u64) -> CreateRoom {
        CreateRoom {
            description: room::Description::new("sea view"),
            price: price.into(),
        }
    }

    #[tokio::test]
    async fn assigns_id_and_stores_room() {
        let service = Service::new(Memory::new());

        let room = service.execute(cmd(500)).await.unwrap();

        assert!(room.id.is_assigned());
        assert_eq!(u64::from(room.price), 500);
        let stored = service
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room.id)))
            .await
            .unwrap();
        assert_eq!(stored, Some(room));
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let db = Memory::new();
        db.set_offline(true);
        let service = Service::new(db);

        let err = service.execute(cmd(500)).await.unwrap_err();

        assert_eq!(err.as_ref().as_entry().code, catalog::Code::InternalError.code());
    }
}
