//! Domain definitions.

pub mod booking;
pub mod room;

pub use self::{booking::Booking, room::Room};
