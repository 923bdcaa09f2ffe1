//! [`Command`] definition.

pub mod create_booking;
pub mod create_room;
pub mod delete_booking;
pub mod delete_room;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_booking::CreateBooking, create_room::CreateRoom,
    delete_booking::DeleteBooking, delete_room::DeleteRoom,
};
