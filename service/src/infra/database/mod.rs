//! [`Database`]-related implementations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use common::catalog::{self, AsEntry};
use derive_more::{Display, Error as StdError, From};

#[cfg(any(test, feature = "memory"))]
pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Memory`] error.
    #[cfg(any(test, feature = "memory"))]
    Memory(memory::Error),

    /// [`Postgres`] error.
    #[cfg(feature = "postgres")]
    Postgres(postgres::Error),
}

impl Error {
    /// Checks whether this error is a violation of a foreign key constraint,
    /// meaning that a referenced row doesn't exist (anymore).
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            #[cfg(any(test, feature = "memory"))]
            Self::Memory(e) => e.is_foreign_key_violation(),
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_foreign_key_violation(),
        }
    }
}

impl AsEntry for Error {
    fn as_entry(&self) -> catalog::Entry {
        catalog::Code::InternalError.wrap(self)
    }
}
