//! Serde helpers for the legacy schema.

use serde::Deserialize;
use serde::Deserializer;

/// Treat an explicit JSON `null` like an absent field.
///
/// The console serializes unset fields as `null`; the legacy decoder always
/// left them at their zero value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
