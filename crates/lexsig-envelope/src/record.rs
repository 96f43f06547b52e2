//! Signable record types.

use crate::ParseError;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// A structured document with one distinguished signature field.
///
/// The signature holds the unpadded standard base64 encoding of the raw
/// signature bytes. Every other serialized field is covered by the signature.
pub trait Record: Serialize {
    /// JSON name of the signature field, omitted from the canonical bytes.
    const SIGNATURE_FIELD: &'static str = "signature";

    /// The stored signature, if any. An empty string counts as unsigned.
    fn signature(&self) -> Option<&str>;

    fn set_signature(&mut self, signature: String);
}

/// A lexicon-style record: a typed post with text, a timestamp and an author DID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LexiconRecord {
    /// Lexicon type identifier (e.g., "app.bsky.feed.post")
    #[serde(rename = "$type")]
    pub record_type: String,

    pub text: String,

    /// RFC 3339 creation timestamp
    pub created_at: String,

    /// DID of the author
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl LexiconRecord {
    /// Create an unsigned record.
    pub fn new(
        record_type: impl Into<String>,
        text: impl Into<String>,
        created_at: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            text: text.into(),
            created_at: created_at.into(),
            author: author.into(),
            signature: None,
        }
    }
}

impl Record for LexiconRecord {
    fn signature(&self) -> Option<&str> {
        self.signature.as_deref().filter(|s| !s.is_empty())
    }

    fn set_signature(&mut self, signature: String) {
        self.signature = Some(signature);
    }
}

/// An arbitrary JSON object. A non-string `signature` value counts as unsigned.
impl Record for Map<String, Value> {
    fn signature(&self) -> Option<&str> {
        self.get(Self::SIGNATURE_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn set_signature(&mut self, signature: String) {
        self.insert(Self::SIGNATURE_FIELD.to_string(), Value::String(signature));
    }
}

/// Parse a JSON object record from text.
///
/// Numbers keep their exact written form and a key repeated inside one object is
/// rejected, so two different texts never parse to the same record.
pub fn parse_json_record(text: &str) -> Result<Map<String, Value>, ParseError> {
    serde_json::from_str::<UniqueKeys>(text)?;
    match serde_json::from_str::<Value>(text)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(ParseError::NotAnObject),
    }
}

/// Walks a JSON document and fails on the first repeated object key.
struct UniqueKeys;

impl<'de> Deserialize<'de> for UniqueKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UniqueKeysVisitor)
    }
}

struct UniqueKeysVisitor;

impl<'de> Visitor<'de> for UniqueKeysVisitor {
    type Value = UniqueKeys;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_unit<E: de::Error>(self) -> Result<UniqueKeys, E> {
        Ok(UniqueKeys)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<UniqueKeys, A::Error> {
        while seq.next_element::<UniqueKeys>()?.is_some() {}
        Ok(UniqueKeys)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<UniqueKeys, A::Error> {
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            if seen.contains(&key) {
                return Err(de::Error::custom(format!("duplicate key {key:?}")));
            }
            map.next_value::<UniqueKeys>()?;
            seen.insert(key);
        }
        Ok(UniqueKeys)
    }
}
