//! # Types
//!
//! Identifiers and property records shared by the encoder, the decoder and
//! the query layer.
//!
//! A property goes through three shapes:
//!
//! - [`ListingRequest`]: raw form input. Counts are wider than the contract
//!   accepts so that out-of-range input can be seen and rejected.
//! - [`Listing`]: the validated listing, typed exactly like the contract's
//!   `create_property` parameters.
//! - [`ListingRecord`]: a listing as read back from the ledger, plus the
//!   fields the ledger assigns (object id, landlord, availability, creation
//!   time).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ListingError, Result};

/// Length in bytes of ledger addresses and object ids.
pub const ID_LENGTH: usize = 32;

fn parse_hex_id(s: &str, what: &str) -> Result<[u8; ID_LENGTH]> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| ListingError::Validation(format!("{what} '{s}' must start with 0x")))?;

    if body.is_empty() || body.len() > ID_LENGTH * 2 {
        return Err(ListingError::Validation(format!(
            "{what} '{s}' must have between 1 and {} hex digits",
            ID_LENGTH * 2
        )));
    }

    // Short forms such as `0x2` are left-padded to the full width.
    let padded = format!("{:0>width$}", body, width = ID_LENGTH * 2);
    let mut bytes = [0u8; ID_LENGTH];
    hex::decode_to_slice(&padded, &mut bytes)
        .map_err(|e| ListingError::Validation(format!("{what} '{s}' is not valid hex: {e}")))?;
    Ok(bytes)
}

/// An account address on the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ID_LENGTH]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }
}

/// Identity of an on-chain object (a property, or the contract package).
///
/// Ids are assigned by the ledger. They can only be parsed, never generated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId([u8; ID_LENGTH]);

impl ObjectId {
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }
}

macro_rules! hex_id_impls {
    ($ty:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = ListingError;

            fn from_str(s: &str) -> Result<Self> {
                parse_hex_id(s, $what).map($ty)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ListingError;

            fn try_from(s: String) -> Result<Self> {
                s.parse()
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> String {
                id.to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($ty))
            }
        }
    };
}

hex_id_impls!(Address, "address");
hex_id_impls!(ObjectId, "object id");

// ─────────────────────────────────────────────────────────
// Listings
// ─────────────────────────────────────────────────────────

/// Listing details as entered in the listing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    pub title: String,
    pub location: String,
    /// Monthly rent in minor currency units (cents).
    pub price: u64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking: u32,
    pub property_type: String,
    #[serde(default)]
    pub description: String,
}

impl ListingRequest {
    /// Check the request against the contract's parameter types.
    ///
    /// Room and parking counts must fit in a `u8`; they are rejected, never
    /// truncated. Title, location and property type are required.
    pub fn validate(&self) -> Result<Listing> {
        require_text("title", &self.title)?;
        require_text("location", &self.location)?;
        require_text("property_type", &self.property_type)?;

        Ok(Listing {
            title: self.title.clone(),
            location: self.location.clone(),
            price: self.price,
            bedrooms: small_count("bedrooms", self.bedrooms)?,
            bathrooms: small_count("bathrooms", self.bathrooms)?,
            parking: small_count("parking", self.parking)?,
            property_type: self.property_type.clone(),
            description: self.description.clone(),
        })
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ListingError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn small_count(field: &str, value: u32) -> Result<u8> {
    u8::try_from(value).map_err(|_| {
        ListingError::Validation(format!("{field} must be between 0 and 255, got {value}"))
    })
}

/// A listing typed like the contract's `create_property` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub location: String,
    pub price: u64,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub parking: u8,
    pub property_type: String,
    pub description: String,
}

/// A property as held on the ledger. Possibly stale; never edited locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: ObjectId,
    #[serde(flatten)]
    pub listing: Listing,
    /// Account controlling the listing (`landlord` on chain).
    pub owner: Address,
    pub is_available: bool,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl ListingRecord {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.created_at)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// Digest returned by the ledger once a call has been accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub digest: String,
}

impl SubmissionResult {
    pub fn new(digest: impl Into<String>) -> Self {
        SubmissionResult {
            digest: digest.into(),
        }
    }

    /// First eight characters of the digest, for status messages.
    pub fn short(&self) -> &str {
        self.digest.get(..8).unwrap_or(&self.digest)
    }
}

/// Convert a decimal amount in major units (`"60000.50"`) into minor units.
///
/// At most two fractional digits are accepted.
pub fn parse_price(input: &str) -> Result<u64> {
    let invalid = || ListingError::Validation(format!("invalid price '{input}'"));

    let s = input.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: u64 = whole.parse().map_err(|_| invalid())?;
    let cents: u64 = format!("{frac:0<2}").parse().map_err(|_| invalid())?;

    whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(|| ListingError::Validation(format!("price '{input}' is too large")))
}
