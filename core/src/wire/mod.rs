//! Transport records for both server dialects and their projection onto the
//! domain types in [`crate::models`].
//!
//! The legacy api encodes dates as `"<seconds>.<fraction>"` strings, the
//! Simperium api as JSON numbers. Both encode `deleted` as an int, a float or a
//! bool depending on which client last touched the note.

pub mod dates;
pub mod deleted;
pub mod legacy;
pub mod simperium;

use serde::{Deserialize, Deserializer};

pub use dates::{decode_float_date, decode_legacy_date, encode_legacy_date};
pub use deleted::DeletedFlag;

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Empty strings on the wire mean "not set".
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
