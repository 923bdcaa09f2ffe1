//! [`Booking`] definitions.

use common::{unit, DateOf, IdOf};

use super::room;
#[cfg(doc)]
use super::Room;

/// Reservation of a [`Room`] for an inclusive range of dates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Booking {
    /// ID of this [`Booking`].
    ///
    /// [`Id::UNASSIGNED`] until this [`Booking`] is inserted into a database.
    pub id: Id,

    /// ID of the booked [`Room`].
    pub room_id: room::Id,

    /// First day of this [`Booking`].
    pub start_date: StartDate,

    /// Last day of this [`Booking`].
    ///
    /// Never before the [`Booking::start_date`].
    pub end_date: EndDate,
}

/// ID of a [`Booking`].
pub type Id = IdOf<Booking>;

/// First day of a [`Booking`].
pub type StartDate = DateOf<(Booking, unit::Start)>;

/// Last day of a [`Booking`].
pub type EndDate = DateOf<(Booking, unit::End)>;
