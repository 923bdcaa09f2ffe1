//! [`Room`] definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;

use common::{unit, DateTimeOf, IdOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};

/// Bookable room.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Room {
    /// ID of this [`Room`].
    ///
    /// [`Id::UNASSIGNED`] until this [`Room`] is inserted into a database.
    pub id: Id,

    /// [`Description`] of this [`Room`].
    pub description: Description,

    /// [`Price`] of this [`Room`].
    pub price: Price,

    /// [`DateTime`] when this [`Room`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

/// ID of a [`Room`].
pub type Id = IdOf<Room>;

/// Free-text description of a [`Room`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

/// Price of a [`Room`] in the smallest currency unit.
///
/// Stored as `INT8`, so only values up to [`i64::MAX`] may be written.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Price(u64);

#[cfg(feature = "postgres")]
impl FromSql<'_> for Price {
    accepts!(INT8);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Ok(Self(u64::try_from(i64::from_sql(ty, raw)?)?))
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Price {
    accepts!(INT8);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        i64::try_from(self.0)?.to_sql(ty, w)
    }
}

/// [`DateTime`] when a [`Room`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Room, unit::Creation)>;

#[cfg(all(test, feature = "postgres"))]
mod spec {
    use postgres_types::{private::BytesMut, ToSql as _, Type};

    use super::Price;

    #[test]
    fn writes_prices_up_to_int8_max_only() {
        let mut buf = BytesMut::new();

        assert!(Price::from(500_u64).to_sql(&Type::INT8, &mut buf).is_ok());
        assert!(Price::from(i64::MAX.unsigned_abs())
            .to_sql(&Type::INT8, &mut buf)
            .is_ok());
        assert!(Price::from(u64::MAX).to_sql(&Type::INT8, &mut buf).is_err());
    }
}
