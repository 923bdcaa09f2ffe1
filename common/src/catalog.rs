//! Catalog of errors exposed to API clients.
//!
//! The catalog is an immutable mapping from numeric [`Code`]s to [`Entry`]s
//! generated at compile time by the [`define_catalog!`] macro.
//!
//! [`define_catalog!`]: crate::define_catalog

use std::fmt;

/// Defines the catalog [`Code`] enum along with its [`Entry`]s.
///
/// # Example
///
/// ```rust
/// # use common::define_catalog;
/// define_catalog! {
///     #[doc = "Shop error code."]
///     enum ShopCode {
///         #[code = 1]
///         #[status = 404]
///         #[message = "no such item"]
///         #[user_message = "Item is gone"]
///         ItemNotExists,
///     }
/// }
///
/// assert_eq!(ShopCode::ItemNotExists.entry().status, 404);
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_catalog {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status:literal]
                #[message = $message:literal]
                #[user_message = $user_message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[doc = $doc]
        #[repr(u64)]
        pub enum $name {
            $(
                #[doc = $message]
                $variant = $code,
            )*
        }

        impl $name {
            /// Returns the numeric value of this code.
            #[must_use]
            pub const fn code(self) -> u64 {
                self as u64
            }

            /// Returns the catalog [`Entry`] of this code.
            ///
            /// [`Entry`]: $crate::catalog::Entry
            #[must_use]
            pub fn entry(self) -> $crate::catalog::Entry {
                match self {
                    $(
                        Self::$variant => $crate::catalog::Entry {
                            code: $code,
                            status: $status,
                            message: ::std::string::String::from($message),
                            user_message: $user_message,
                        },
                    )*
                }
            }

            /// Returns the catalog [`Entry`] of this code with its message
            /// replaced by the description of the provided `err`or.
            ///
            /// [`Entry`]: $crate::catalog::Entry
            #[must_use]
            pub fn wrap(
                self,
                err: &(impl ::core::fmt::Display + ?Sized),
            ) -> $crate::catalog::Entry {
                $crate::catalog::Entry {
                    message: ::std::string::ToString::to_string(err),
                    ..self.entry()
                }
            }
        }

        impl ::core::convert::TryFrom<u64> for $name {
            type Error = u64;

            fn try_from(code: u64) -> ::core::result::Result<Self, u64> {
                match code {
                    $(
                        $code => Ok(Self::$variant),
                    )*
                    unknown => Err(unknown),
                }
            }
        }
    };
}

define_catalog! {
    #[doc = "Code of an error exposed to API clients."]
    enum Code {
        #[code = 101]
        #[status = 500]
        #[message = "something went wrong"]
        #[user_message = "Что-то пошло не так"]
        InternalError,

        #[code = 102]
        #[status = 400]
        #[message = "wrong request data"]
        #[user_message = "Неверный формат запроса"]
        BadRequest,

        #[code = 103]
        #[status = 404]
        #[message = "room with this id doesn't exist"]
        #[user_message = "Комнаты с таким ID не существует"]
        RoomNotExists,

        #[code = 104]
        #[status = 404]
        #[message = "booking with this id doesn't exist"]
        #[user_message = "Брони с таким ID не существует"]
        BookingNotExists,

        #[code = 105]
        #[status = 400]
        #[message = "end date is earlier than start date"]
        #[user_message = "Дата окончания раньше даты начала"]
        IncorrectDates,
    }
}

/// Entry of the errors catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    /// Numeric [`Code`] of this [`Entry`].
    pub code: u64,

    /// HTTP status code to respond with.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub status: u16,

    /// Message for developers.
    pub message: String,

    /// Localized message for end users.
    pub user_message: &'static str,
}

impl Entry {
    /// HTTP status of the [`Entry`] returned for unknown codes.
    pub const WRONG_CODE_STATUS: u16 = 418;

    /// Returns the [`Entry`] used for unknown codes.
    #[must_use]
    pub fn wrong_code() -> Self {
        Self {
            code: 0,
            status: Self::WRONG_CODE_STATUS,
            message: "wrong error code".to_owned(),
            user_message: "Что-то пошло не так",
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.code, self.message)
    }
}

/// Looks up the [`Entry`] of the provided raw `code`.
///
/// [`Entry::wrong_code()`] is returned for unknown codes.
#[must_use]
pub fn lookup(code: u64) -> Entry {
    Code::try_from(code).map_or_else(|_| Entry::wrong_code(), Code::entry)
}

/// Same as [`lookup()`], but replaces the message of the found [`Entry`] with
/// the description of the provided `err`or.
///
/// Unknown codes still result in an unmodified [`Entry::wrong_code()`].
#[must_use]
pub fn wrap(code: u64, err: &(impl fmt::Display + ?Sized)) -> Entry {
    Code::try_from(code)
        .map_or_else(|_| Entry::wrong_code(), |code| code.wrap(err))
}

/// Classification of an error into a catalog [`Entry`].
pub trait AsEntry {
    /// Returns the catalog [`Entry`] describing this error.
    fn as_entry(&self) -> Entry;
}

#[cfg(test)]
mod spec {
    use super::{lookup, wrap, Code, Entry};

    #[test]
    fn looks_up_known_codes() {
        for (code, status) in [
            (Code::InternalError, 500),
            (Code::BadRequest, 400),
            (Code::RoomNotExists, 404),
            (Code::BookingNotExists, 404),
            (Code::IncorrectDates, 400),
        ] {
            let entry = lookup(code.code());

            assert_eq!(entry, code.entry());
            assert_eq!(entry.code, code.code());
            assert_eq!(entry.status, status);
        }
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(Code::InternalError.code(), 101);
        assert_eq!(Code::BadRequest.code(), 102);
        assert_eq!(Code::RoomNotExists.code(), 103);
        assert_eq!(Code::BookingNotExists.code(), 104);
        assert_eq!(Code::IncorrectDates.code(), 105);
    }

    #[test]
    fn falls_back_on_unknown_codes() {
        for code in [0, 100, 106, u64::MAX] {
            let entry = lookup(code);

            assert_eq!(entry, Entry::wrong_code());
            assert_eq!(entry.status, 418);
        }
    }

    #[test]
    fn wraps_messages() {
        let entry = wrap(Code::InternalError.code(), "connection refused");

        assert_eq!(entry.message, "connection refused");
        assert_eq!(entry.status, 500);
        assert_eq!(entry.user_message, Code::InternalError.entry().user_message);
    }

    #[test]
    fn wrapping_unknown_code_keeps_fallback() {
        assert_eq!(wrap(999, "boom"), Entry::wrong_code());
    }

    #[test]
    fn lookups_are_not_affected_by_wrapping() {
        let _ = wrap(Code::RoomNotExists.code(), "whatever");

        assert_eq!(
            lookup(Code::RoomNotExists.code()).message,
            "room with this id doesn't exist",
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_without_status() {
        let json = serde_json::to_value(Code::RoomNotExists.entry()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "code": 103,
                "message": "room with this id doesn't exist",
                "user_message": "Комнаты с таким ID не существует",
            }),
        );
    }
}
