//! Macro for implementing Display, FromStr and serde for status enums
//!
//! The controller spells the same state differently depending on the API
//! surface (`queued` on v2 jobs, `PROCESSING` on v3 jobs, `STAGED` on
//! droplets). This macro gives every status enum one canonical spelling for
//! output and case-insensitive parsing of the canonical form plus any aliases.
//!
//! # Example
//!
//! ```rust
//! use skiff_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum BuildStatus {
//!     Pending,
//!     Done,
//! }
//!
//! impl_domain_status_conversions!(BuildStatus {
//!     Pending => "PENDING" | "queued",
//!     Done => "DONE",
//! });
//!
//! assert_eq!("queued".parse::<BuildStatus>().unwrap(), BuildStatus::Pending);
//! assert_eq!(BuildStatus::Done.to_string(), "DONE");
//! ```

/// Implements Display, FromStr, Serialize and Deserialize for status enums
///
/// This macro generates:
/// - Display trait: writes the canonical spelling
/// - FromStr trait: parses the canonical spelling or any alias, ignoring case
/// - Serialize/Deserialize: round-trip through the two traits above
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) $(|| s.eq_ignore_ascii_case($alias))* {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let raw = <::std::string::String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
