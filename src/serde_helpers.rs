//! Serde helpers for flexible deserialization.

#[cfg(feature = "listing")]
use serde::de::DeserializeOwned;

/// A `serde_as` type that deserializes strings or integers as `String`.
///
/// Use with `#[serde_as(as = "StringFromAny")]` for `String` fields, or through
/// [`serde_with::As`] in a `deserialize_with` function.
#[cfg(feature = "ws")]
pub struct StringFromAny;

#[cfg(feature = "ws")]
impl<'de> serde_with::DeserializeAs<'de, String> for StringFromAny {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use std::fmt;

        use serde::de::{self, Visitor};

        struct StringOrNumberVisitor;

        impl Visitor<'_> for StringOrNumberVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("string or integer")
            }

            fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_owned())
            }

            fn visit_string<E>(self, v: String) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }
        }

        deserializer.deserialize_any(StringOrNumberVisitor)
    }
}

/// Deserializes `json` into `T`, logging the path of the offending field on failure.
///
/// # Example
///
/// ```ignore
/// let config: PlatformConfig = deserialize_str(blob)?;
/// ```
#[cfg(feature = "listing")]
pub fn deserialize_str<T: DeserializeOwned>(json: &str) -> crate::Result<T> {
    use std::any::type_name;

    let jd = &mut serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(jd)
        .inspect_err(|e| {
            tracing::error!(
                type_name = %type_name::<T>(),
                path = %e.path(),
                error = %e.inner(),
                "deserialization failed"
            );
        })
        .map_err(Into::into)
}
