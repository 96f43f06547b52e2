//! Canonical byte form of a record.
//!
//! The record is serialized to a JSON value, its signature field is dropped, and
//! the remainder is written with object keys sorted at every level and no
//! whitespace. Sign and verify both hash exactly these bytes.

use crate::{CanonicalError, Record};
use serde_json::{Map, Value};

/// Produce the canonical bytes of `record`, excluding its signature field.
///
/// The record itself is never modified.
pub fn canonicalize<R: Record + ?Sized>(record: &R) -> Result<Vec<u8>, CanonicalError> {
    let mut fields = match serde_json::to_value(record)? {
        Value::Object(fields) => fields,
        _ => return Err(CanonicalError::NotAnObject),
    };
    fields.remove(R::SIGNATURE_FIELD);

    let mut out = Vec::new();
    write_object(&mut out, &fields)?;
    Ok(out)
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), CanonicalError> {
    match value {
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(fields) => write_object(out, fields)?,
        // Scalars and strings use serde_json's compact form and escaping.
        scalar => serde_json::to_writer(&mut *out, scalar)?,
    }
    Ok(())
}

fn write_object(out: &mut Vec<u8>, fields: &Map<String, Value>) -> Result<(), CanonicalError> {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();

    out.push(b'{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        serde_json::to_writer(&mut *out, key)?;
        out.push(b':');
        write_value(out, &fields[key])?;
    }
    out.push(b'}');
    Ok(())
}
