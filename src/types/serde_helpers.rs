//! Custom serde helpers for C2CX's loosely typed JSON.
//!
//! The exchange mixes JSON numbers and numeric strings for the same fields
//! (`"timestamp": "1491365351"` next to `"createDate": 1467186908787`), and
//! returns either a single object or an array for some `data` payloads.

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::{Deserialize, Deserializer, de};

/// Deserialize an `i64` from either a JSON integer or a numeric string.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use c2cx_api_client::types::serde_helpers::string_or_i64;
///
/// #[derive(Deserialize)]
/// struct Book {
///     #[serde(deserialize_with = "string_or_i64::deserialize")]
///     timestamp: i64,
/// }
///
/// let book: Book = serde_json::from_str(r#"{"timestamp":"1491365351"}"#).unwrap();
/// assert_eq!(book.timestamp, 1491365351);
/// let book: Book = serde_json::from_str(r#"{"timestamp":1491365351}"#).unwrap();
/// assert_eq!(book.timestamp, 1491365351);
/// ```
pub mod string_or_i64 {
    use super::*;

    /// Deserialize a number or numeric string into an `i64`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct I64Visitor;

        impl de::Visitor<'_> for I64Visitor {
            type Value = i64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer or a numeric string")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(v).map_err(de::Error::custom)
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v.fract() == 0.0 && v.is_finite() {
                    Ok(v as i64)
                } else {
                    Err(de::Error::custom(format!("expected an integer, got {v}")))
                }
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.trim().parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(I64Visitor)
    }
}

/// Deserialize a `String` from either a JSON string or a JSON number.
///
/// Used for identifiers such as `orderId`, which arrive as `"298"` from order
/// creation and as `243506` from order queries.
pub mod string_or_number {
    use super::*;

    /// Deserialize a string or number into its textual form.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringVisitor;

        impl de::Visitor<'_> for StringVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or a number")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }
        }

        deserializer.deserialize_any(StringVisitor)
    }
}

/// Deserialize a `Vec<T>` from an array, a single object, or `null`.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use c2cx_api_client::types::serde_helpers::one_or_many;
///
/// #[derive(Deserialize)]
/// struct Item {
///     id: u32,
/// }
///
/// #[derive(Deserialize)]
/// struct Response {
///     #[serde(deserialize_with = "one_or_many::deserialize")]
///     data: Vec<Item>,
/// }
///
/// let r: Response = serde_json::from_str(r#"{"data":{"id":1}}"#).unwrap();
/// assert_eq!(r.data.len(), 1);
/// let r: Response = serde_json::from_str(r#"{"data":[{"id":1},{"id":2}]}"#).unwrap();
/// assert_eq!(r.data.len(), 2);
/// let r: Response = serde_json::from_str(r#"{"data":null}"#).unwrap();
/// assert!(r.data.is_empty());
/// ```
pub mod one_or_many {
    use super::*;

    /// Deserialize one object or a sequence of objects into a `Vec`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T> de::Visitor<'de> for OneOrManyVisitor<T>
        where
            T: Deserialize<'de>,
        {
            type Value = Vec<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object, an array of objects, or null")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(items)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                T::deserialize(MapAccessDeserializer::new(map)).map(|item| vec![item])
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Vec::new())
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Vec::new())
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Stamp {
        #[serde(deserialize_with = "string_or_i64::deserialize")]
        value: i64,
    }

    #[derive(Deserialize)]
    struct Id {
        #[serde(deserialize_with = "string_or_number::deserialize")]
        value: String,
    }

    #[test]
    fn test_string_or_i64() {
        let s: Stamp = serde_json::from_str(r#"{"value":" 42 "}"#).unwrap();
        assert_eq!(s.value, 42);
        let s: Stamp = serde_json::from_str(r#"{"value":1467186908787}"#).unwrap();
        assert_eq!(s.value, 1_467_186_908_787);
        let s: Stamp = serde_json::from_str(r#"{"value":-1}"#).unwrap();
        assert_eq!(s.value, -1);
        assert!(serde_json::from_str::<Stamp>(r#"{"value":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Stamp>(r#"{"value":1.5}"#).is_err());
    }

    #[test]
    fn test_string_or_number() {
        let id: Id = serde_json::from_str(r#"{"value":"298"}"#).unwrap();
        assert_eq!(id.value, "298");
        let id: Id = serde_json::from_str(r#"{"value":243506}"#).unwrap();
        assert_eq!(id.value, "243506");
    }
}
