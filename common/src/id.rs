//! Store-assigned identifiers.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::ParseIntError,
    str::FromStr,
};

use derive_more::Debug;
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};

/// Unsigned identifier of an `Of` entity, assigned by a store on insertion.
///
/// Stored as `INT8`, so only values up to [`i64::MAX`] may be written.
#[derive(Debug)]
pub struct IdOf<Of: ?Sized> {
    /// Inner representation of the identifier.
    inner: u64,

    /// Type parameter describing the identified entity.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> IdOf<Of> {
    /// Identifier of an entity not inserted into a store yet.
    pub const UNASSIGNED: Self = Self::new(0);

    /// Creates a new [`IdOf`] out of its raw value.
    #[must_use]
    pub const fn new(inner: u64) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }

    /// Returns the raw value of this [`IdOf`].
    #[must_use]
    pub const fn get(self) -> u64 {
        self.inner
    }

    /// Indicates whether this [`IdOf`] has been assigned by a store.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.inner != Self::UNASSIGNED.inner
    }
}

impl<Of: ?Sized> fmt::Display for IdOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<Of: ?Sized> FromStr for IdOf<Of> {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::new)
    }
}

impl<Of: ?Sized> From<u64> for IdOf<Of> {
    fn from(inner: u64) -> Self {
        Self::new(inner)
    }
}

impl<Of: ?Sized> From<IdOf<Of>> for u64 {
    fn from(id: IdOf<Of>) -> Self {
        id.inner
    }
}

impl<Of: ?Sized> Copy for IdOf<Of> {}
impl<Of: ?Sized> Clone for IdOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for IdOf<Of> {}
impl<Of: ?Sized> PartialEq for IdOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for IdOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for IdOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> Hash for IdOf<Of> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for IdOf<Of> {
    accepts!(INT8);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Ok(Self::new(u64::try_from(i64::from_sql(ty, raw)?)?))
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for IdOf<Of> {
    accepts!(INT8);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        i64::try_from(self.inner)?.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::IdOf;

    impl<Of: ?Sized> Serialize for IdOf<Of> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_u64(self.get())
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for IdOf<Of> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            u64::deserialize(deserializer).map(Self::new)
        }
    }
}
