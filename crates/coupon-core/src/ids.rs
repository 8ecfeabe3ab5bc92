//! Identifier types for coupons and users.
//!
//! Both identifiers are opaque strings kept exactly as supplied: `" u1"` and
//! `"u1"` are different users. Parsing only rejects blank values, values over
//! the storage cap and values holding a NUL byte.
//!
//! # Macro-based ID Types
//!
//! The `string_id_type!` macro reduces boilerplate for string identifiers,
//! ensuring consistent implementation of serialization, parsing, and display traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a coupon name, in bytes.
///
/// Keeps primary-key index entries well inside PostgreSQL's btree row limit.
pub const MAX_COUPON_NAME_LEN: usize = 1024;

/// Maximum length of a user identifier, in bytes.
pub const MAX_USER_ID_LEN: usize = 1024;

/// Macro to define a validated string identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `String` with implementations for:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `Serialize`, `Deserialize` (as string, validated)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`, `AsRef<str>`
macro_rules! string_id_type {
    ($name:ident, $field:literal, $max_len:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate an identifier.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is empty or all whitespace, longer
            /// than the cap, or contains a NUL byte.
            pub fn new(value: impl AsRef<str>) -> Result<Self, IdError> {
                let value = value.as_ref();
                if value.trim().is_empty() {
                    return Err(IdError::Empty { field: $field });
                }
                if value.len() > $max_len {
                    return Err(IdError::TooLong {
                        field: $field,
                        max: $max_len,
                    });
                }
                // TEXT columns cannot hold NUL.
                if value.contains('\0') {
                    return Err(IdError::NulByte { field: $field });
                }
                Ok(Self(value.to_string()))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id_type!(
    CouponName,
    "coupon name",
    MAX_COUPON_NAME_LEN,
    "The unique, immutable name of a coupon.\n\nCoupon names are case-sensitive: `FLASH5` and `flash5` are different coupons."
);
string_id_type!(
    UserId,
    "user id",
    MAX_USER_ID_LEN,
    "An opaque user identifier.\n\nNo format is imposed beyond presence; the caller's identity system owns it."
);

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is empty or all whitespace.
    #[error("{field} must not be empty")]
    Empty {
        /// Which identifier was being parsed.
        field: &'static str,
    },

    /// The input exceeds the length cap.
    #[error("{field} must be at most {max} bytes")]
    TooLong {
        /// Which identifier was being parsed.
        field: &'static str,
        /// The length cap.
        max: usize,
    },

    /// The input contains a NUL byte.
    #[error("{field} must not contain NUL bytes")]
    NulByte {
        /// Which identifier was being parsed.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_name_is_kept_verbatim() {
        let name = CouponName::new("  FLASH5 ").unwrap();
        assert_eq!(name.as_str(), "  FLASH5 ");
        assert_ne!(name, CouponName::new("FLASH5").unwrap());
    }

    #[test]
    fn coupon_name_rejects_blank() {
        assert_eq!(
            CouponName::new("   "),
            Err(IdError::Empty {
                field: "coupon name"
            })
        );
        assert!(CouponName::from_str("").is_err());
    }

    #[test]
    fn coupon_name_rejects_overlong() {
        let long = "x".repeat(MAX_COUPON_NAME_LEN + 1);
        assert!(matches!(
            CouponName::new(long),
            Err(IdError::TooLong { max, .. }) if max == MAX_COUPON_NAME_LEN
        ));

        let exact = "x".repeat(MAX_COUPON_NAME_LEN);
        assert!(CouponName::new(exact).is_ok());
    }

    #[test]
    fn user_id_rejects_nul() {
        assert_eq!(
            UserId::new("user\u{0}1"),
            Err(IdError::NulByte { field: "user id" })
        );
    }

    #[test]
    fn user_id_is_opaque() {
        let id = UserId::new("tester 1@example").unwrap();
        assert_eq!(id.as_str(), "tester 1@example");

        let padded = UserId::new(" u1").unwrap();
        assert_eq!(padded.as_str(), " u1");
        assert_ne!(padded, UserId::new("u1").unwrap());

        let tabbed = UserId::new("u\t1").unwrap();
        assert_eq!(tabbed.as_str(), "u\t1");

        let long = "u".repeat(300);
        assert_eq!(UserId::new(&long).unwrap().as_str(), long);
    }

    #[test]
    fn user_id_serde_json() {
        let id = UserId::new("greedy_user_88").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"greedy_user_88\"");
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn deserialize_validates() {
        let result: Result<CouponName, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
