//! # Decoders
//!
//! A loader is parametrized by the type it produces. That type implements
//! [`Decode`], a single factory that turns the fetched bytes into a value or
//! reports that it cannot.
//!
//! Built-in decoders:
//! - [`Bytes`] and `Vec<u8>`: raw pass-through
//! - `String`: UTF-8 text
//! - [`JsonObject`]: a JSON object as a dynamic string-keyed map
//! - [`JsonArray`]: a JSON array as a dynamic sequence
//! - [`Json<T>`]: a typed document for any `serde` deserializable `T`
//! - [`JsonList<T>`]: a typed array of documents
//!
//! Image or XML decoders live outside this crate; implement [`Decode`] for the
//! target type to use them:
//!
//! ```rust
//! use resource_loader::decode::Decode;
//!
//! struct Utf16Units(Vec<u16>);
//!
//! impl Decode for Utf16Units {
//!     fn try_decode(bytes: &[u8]) -> Option<Self> {
//!         if bytes.len() % 2 != 0 {
//!             return None;
//!         }
//!         Some(Self(
//!             bytes
//!                 .chunks_exact(2)
//!                 .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
//!                 .collect(),
//!         ))
//!     }
//! }
//! ```

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Conversion from raw fetched bytes into a typed value.
pub trait Decode: Sized {
    /// Decode `bytes`, returning `None` when they are not a valid `Self`.
    fn try_decode(bytes: &[u8]) -> Option<Self>;
}

impl Decode for Bytes {
    fn try_decode(bytes: &[u8]) -> Option<Self> {
        Some(Bytes::copy_from_slice(bytes))
    }
}

impl Decode for Vec<u8> {
    fn try_decode(bytes: &[u8]) -> Option<Self> {
        Some(bytes.to_vec())
    }
}

impl Decode for String {
    fn try_decode(bytes: &[u8]) -> Option<Self> {
        std::str::from_utf8(bytes).ok().map(str::to_owned)
    }
}

/// A JSON object with dynamically typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonObject {
    pub value: Map<String, Value>,
}

impl Decode for JsonObject {
    fn try_decode(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(bytes).ok()? {
            Value::Object(value) => Some(Self { value }),
            _ => None,
        }
    }
}

/// A JSON array with dynamically typed elements.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonArray {
    pub value: Vec<Value>,
}

impl Decode for JsonArray {
    fn try_decode(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(bytes).ok()? {
            Value::Array(value) => Some(Self { value }),
            _ => None,
        }
    }
}

/// A JSON document deserialized into a user-supplied schema type.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T> {
    pub value: T,
}

impl<T: DeserializeOwned> Decode for Json<T> {
    fn try_decode(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok().map(|value| Self { value })
    }
}

/// A JSON array deserialized into a list of user-supplied schema values.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonList<T> {
    pub value: Vec<T>,
}

impl<T: DeserializeOwned> Decode for JsonList<T> {
    fn try_decode(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok().map(|value| Self { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const OBJECT: &[u8] = br#"{"number":1,"string":"s","bool":true,"empty":null}"#;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        number: i64,
        string: String,
        bool: bool,
        empty: Option<String>,
    }

    #[test]
    fn test_json_object_decodes_all_keys() {
        let object = JsonObject::try_decode(OBJECT).unwrap();
        assert_eq!(object.value.len(), 4);
        assert_eq!(object.value["number"].as_i64(), Some(1));
        assert_eq!(object.value["string"].as_str(), Some("s"));
        assert_eq!(object.value["bool"].as_bool(), Some(true));
        assert!(object.value["empty"].is_null());
    }

    #[test]
    fn test_json_object_rejects_malformed_and_arrays() {
        assert!(JsonObject::try_decode(b"{\"number\":").is_none());
        assert!(JsonObject::try_decode(b"[1, 2]").is_none());
        assert!(JsonObject::try_decode(b"").is_none());
    }

    #[test]
    fn test_json_array() {
        let array = JsonArray::try_decode(br#"[1, "two", null]"#).unwrap();
        assert_eq!(array.value.len(), 3);
        assert_eq!(array.value[1], Value::String("two".into()));
        assert!(JsonArray::try_decode(OBJECT).is_none());
    }

    #[test]
    fn test_typed_document() {
        let doc = Json::<Sample>::try_decode(OBJECT).unwrap();
        assert_eq!(
            doc.value,
            Sample {
                number: 1,
                string: "s".into(),
                bool: true,
                empty: None,
            }
        );
        assert!(Json::<Sample>::try_decode(br#"{"number":"one"}"#).is_none());
    }

    #[test]
    fn test_typed_list() {
        let list = JsonList::<u32>::try_decode(b"[3, 1, 2]").unwrap();
        assert_eq!(list.value, vec![3, 1, 2]);
        assert!(JsonList::<u32>::try_decode(b"[-1]").is_none());
    }

    #[test]
    fn test_raw_and_text() {
        assert_eq!(
            Bytes::try_decode(&[0xff, 0x00]).unwrap(),
            Bytes::from_static(&[0xff, 0x00])
        );
        assert_eq!(String::try_decode(b"hello").as_deref(), Some("hello"));
        assert!(String::try_decode(&[0xff, 0xfe]).is_none());
    }
}
