//! Serde helper for nullable PATCH fields.
//!
//! Plain serde folds an absent field and an explicit `null` into the same
//! outer `None`, which would make clearing a nullable column impossible over
//! JSON. Pairing this deserializer with `#[serde(default)]` keeps the three
//! cases apart: absent stays `None`, `null` becomes `Some(None)`, and a
//! value becomes `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

pub(crate) fn deserialize<'de, T, D>(
  de: D,
) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}
