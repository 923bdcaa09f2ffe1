//! [`Handler`] abstraction.
//!
//! Commands, queries and database operations are all expressed as
//! [`Handler`]s parametrized by their argument type, so a single value (like a
//! `Service` or a database client) may handle many different operations.

use std::future::Future;

/// Something able to handle `Args` asynchronously.
pub trait Handler<Args = ()> {
    /// Type of a successful result.
    type Ok;

    /// Type of a failed result.
    type Err;

    /// Handles the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
