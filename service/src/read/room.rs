//! [`Room`]-related read definitions.

#[cfg(doc)]
use crate::domain::Room;

pub mod list {
    //! [`Room`] list definitions.

    use std::str::FromStr as _;

    use strum::EnumString;

    #[cfg(doc)]
    use crate::domain::Room;

    /// Key to order a [`Room`] list by.
    #[derive(Clone, Copy, Debug, EnumString, Eq, PartialEq)]
    #[strum(serialize_all = "snake_case")]
    pub enum SortKey {
        /// Order by [`Room::created_at`].
        Created,

        /// Order by [`Room::price`].
        Price,
    }

    /// Ordering of a [`Room`] list.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Sort {
        /// [`SortKey`] to order by.
        ///
        /// [`None`] means the insertion order, in which case
        /// [`Sort::descending`] is ignored.
        pub key: Option<SortKey>,

        /// Indicator whether the order is descending.
        pub descending: bool,
    }

    impl Sort {
        /// Creates a new [`Sort`] out of the raw `key`.
        ///
        /// Unknown keys fall back to the insertion order.
        #[must_use]
        pub fn new(key: &str, descending: bool) -> Self {
            Self {
                key: SortKey::from_str(key).ok(),
                descending,
            }
        }
    }

}
