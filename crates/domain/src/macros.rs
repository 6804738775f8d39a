//! Macro for implementing Display and FromStr for remote status enums
//!
//! The remote API reports job states as free-form strings ("DONE GATHERING
//! RESULTS", "Success", ...). This macro maps them onto closed enums with a
//! single table used in both directions.
//!
//! # Example
//!
//! ```rust
//! use lookupsync_domain::impl_remote_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ExportStatus {
//!     Queued,
//!     Finished,
//! }
//!
//! impl_remote_status_conversions!(ExportStatus {
//!     Queued => "QUEUED",
//!     Finished => "FINISHED",
//! });
//!
//! assert_eq!("finished".parse::<ExportStatus>(), Ok(ExportStatus::Finished));
//! assert_eq!(ExportStatus::Queued.to_string(), "QUEUED");
//! ```

/// Implements Display and FromStr for enums mirroring remote status strings
///
/// - Display writes the exact wire representation
/// - FromStr matches case-insensitively and ignores surrounding whitespace
/// - Unknown strings are rejected with the enum name and the offending value
#[macro_export]
macro_rules! impl_remote_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
