//! State decoder: reads property objects returned by the ledger.
//!
//! The fullnode answers `sui_getObject` with
//! `{"data": {"objectId": .., "content": {"dataType": "moveObject", "fields": {..}}}}`.
//! A response without `data`, `content` or `fields` means the object does not
//! exist (or is not a Move object) and decodes to [`Decoded::NotFound`]. A
//! response that has fields but not the ones a property needs is a
//! [`ListingError::DecodeFailed`].

use serde_json::{Map, Value};

use crate::errors::{ListingError, Result};
use crate::types::{Address, Listing, ListingRecord, ObjectId};

/// Outcome of decoding an object lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Found(ListingRecord),
    NotFound,
}

impl Decoded {
    pub fn into_option(self) -> Option<ListingRecord> {
        match self {
            Decoded::Found(record) => Some(record),
            Decoded::NotFound => None,
        }
    }
}

/// Decode a full `sui_getObject` result.
///
/// `requested` is used as the record id when the response omits `objectId`.
pub fn decode_object(requested: ObjectId, response: Option<&Value>) -> Result<Decoded> {
    let Some(data) = response.and_then(|r| r.get("data")) else {
        return Ok(Decoded::NotFound);
    };

    let id = match data.get("objectId").and_then(Value::as_str) {
        Some(raw) => raw
            .parse()
            .map_err(|e| ListingError::DecodeFailed(format!("objectId: {e}")))?,
        None => requested,
    };

    decode_content(id, data.get("content"))
}

/// Decode the `content` part of an object (`{"fields": {..}}`).
pub fn decode_content(id: ObjectId, content: Option<&Value>) -> Result<Decoded> {
    match content.and_then(|c| c.get("fields")) {
        None | Some(Value::Null) => Ok(Decoded::NotFound),
        Some(Value::Object(fields)) => decode_fields(id, fields).map(Decoded::Found),
        Some(other) => Err(ListingError::DecodeFailed(format!(
            "'fields' is not an object: {other}"
        ))),
    }
}

/// Schema-check a property's field map.
pub fn decode_fields(id: ObjectId, fields: &Map<String, Value>) -> Result<ListingRecord> {
    let listing = Listing {
        title: required_text(fields, "title")?,
        location: required_text(fields, "location")?,
        price: required_int(fields, "price")?,
        bedrooms: small_int(fields, "bedrooms")?,
        bathrooms: small_int(fields, "bathrooms")?,
        parking: small_int(fields, "parking")?,
        property_type: optional_text(fields, "property_type")?,
        description: optional_text(fields, "description")?,
    };

    let owner: Address = required_text(fields, "landlord")?
        .parse()
        .map_err(|e| ListingError::DecodeFailed(format!("landlord: {e}")))?;

    let is_available = match required(fields, "is_available")? {
        Value::Bool(b) => *b,
        other => {
            return Err(ListingError::DecodeFailed(format!(
                "field 'is_available' is not a boolean: {other}"
            )))
        }
    };

    let created_at = match fields.get("created_at") {
        Some(v) => parse_int(v, "created_at")?,
        None => 0,
    };

    Ok(ListingRecord {
        id,
        listing,
        owner,
        is_available,
        created_at,
    })
}

// ─────────────────────────────────────────────────────────
// Field readers
// ─────────────────────────────────────────────────────────

fn required<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    match fields.get(key) {
        Some(Value::Null) | None => Err(ListingError::DecodeFailed(format!(
            "missing required field '{key}'"
        ))),
        Some(v) => Ok(v),
    }
}

fn required_text(fields: &Map<String, Value>, key: &str) -> Result<String> {
    as_text(required(fields, key)?, key)
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Result<String> {
    match fields.get(key) {
        Some(Value::Null) | None => Ok(String::new()),
        Some(v) => as_text(v, key),
    }
}

fn as_text(value: &Value, key: &str) -> Result<String> {
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| ListingError::DecodeFailed(format!("field '{key}' is not text: {value}")))
}

fn required_int(fields: &Map<String, Value>, key: &str) -> Result<u64> {
    parse_int(required(fields, key)?, key)
}

fn small_int(fields: &Map<String, Value>, key: &str) -> Result<u8> {
    let value = match fields.get(key) {
        Some(Value::Null) | None => return Ok(0),
        Some(v) => parse_int(v, key)?,
    };
    u8::try_from(value)
        .map_err(|_| ListingError::DecodeFailed(format!("field '{key}' out of range: {value}")))
}

/// u64 fields arrive as decimal text, smaller integers as JSON numbers.
fn parse_int(value: &Value, key: &str) -> Result<u64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ListingError::DecodeFailed(format!("field '{key}' is not an unsigned integer: {value}"))
    })
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
