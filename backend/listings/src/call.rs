//! Call encoder: turns listing operations into `property` contract calls.
//!
//! A [`MoveCall`] names `<package>::property::<function>` and carries its
//! arguments in the exact order and types the contract declares. Encoding
//! is pure; nothing here talks to the ledger or to a wallet.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::errors::{ListingError, Result};
use crate::types::{Address, Listing, ListingRequest, ObjectId};

/// Module of the property contract inside the published package.
pub const PROPERTY_MODULE: &str = "property";

/// Struct type name of property objects inside [`PROPERTY_MODULE`].
pub const PROPERTY_STRUCT: &str = "Property";

/// Entry functions of the property contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyFunction {
    CreateProperty,
    UpdateAvailability,
    RentProperty,
}

impl PropertyFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateProperty => "create_property",
            Self::UpdateAvailability => "update_availability",
            Self::RentProperty => "rent_property",
        }
    }
}

/// Fully qualified function, rendered as `<package>::<module>::<function>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    pub package: ObjectId,
    pub module: &'static str,
    pub function: PropertyFunction,
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function.as_str())
    }
}

impl Serialize for CallTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ─────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────

/// A pure (by-value) argument, typed as the contract parameter it feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PureArg {
    String(String),
    U8(u8),
    /// 64-bit values travel as JSON strings so JavaScript hosts keep precision.
    U64(#[serde(serialize_with = "u64_as_string")] u64),
    Bool(bool),
    Address(Address),
}

fn u64_as_string<S: Serializer>(value: &u64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl PureArg {
    /// BCS encoding of the value, as the ledger expects for pure inputs.
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            Self::String(s) => bcs::to_bytes(s),
            Self::U8(v) => bcs::to_bytes(v),
            Self::U64(v) => bcs::to_bytes(v),
            Self::Bool(v) => bcs::to_bytes(v),
            Self::Address(a) => bcs::to_bytes(a.as_bytes()),
        };
        bytes.map_err(|e| ListingError::Validation(format!("BCS encoding failed: {e}")))
    }
}

/// One argument of a [`MoveCall`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallArg {
    Pure {
        #[serde(flatten)]
        value: PureArg,
    },
    /// An existing on-chain object, passed by id.
    Object { id: ObjectId },
}

impl CallArg {
    fn pure(value: PureArg) -> Self {
        CallArg::Pure { value }
    }
}

/// A contract call ready to be handed to a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveCall {
    pub target: CallTarget,
    pub arguments: Vec<CallArg>,
}

// ─────────────────────────────────────────────────────────
// Encoder
// ─────────────────────────────────────────────────────────

/// Builds calls against one published property package.
#[derive(Debug, Clone)]
pub struct CallEncoder {
    package_id: ObjectId,
}

impl CallEncoder {
    pub fn new(package_id: ObjectId) -> Self {
        CallEncoder { package_id }
    }

    pub fn package_id(&self) -> ObjectId {
        self.package_id
    }

    fn target(&self, function: PropertyFunction) -> CallTarget {
        CallTarget {
            package: self.package_id,
            module: PROPERTY_MODULE,
            function,
        }
    }

    /// Validate a listing request and encode `create_property`.
    ///
    /// Fails with [`ListingError::Validation`] before any call is built.
    pub fn create_property(&self, request: &ListingRequest) -> Result<MoveCall> {
        let listing = request.validate()?;
        Ok(self.create_listing(listing))
    }

    /// Encode `create_property` for an already validated listing.
    pub fn create_listing(&self, listing: Listing) -> MoveCall {
        MoveCall {
            target: self.target(PropertyFunction::CreateProperty),
            arguments: vec![
                CallArg::pure(PureArg::String(listing.title)),
                CallArg::pure(PureArg::String(listing.location)),
                CallArg::pure(PureArg::U64(listing.price)),
                CallArg::pure(PureArg::U8(listing.bedrooms)),
                CallArg::pure(PureArg::U8(listing.bathrooms)),
                CallArg::pure(PureArg::U8(listing.parking)),
                CallArg::pure(PureArg::String(listing.property_type)),
                CallArg::pure(PureArg::String(listing.description)),
            ],
        }
    }

    pub fn update_availability(&self, property: ObjectId, is_available: bool) -> MoveCall {
        MoveCall {
            target: self.target(PropertyFunction::UpdateAvailability),
            arguments: vec![
                CallArg::Object { id: property },
                CallArg::pure(PureArg::Bool(is_available)),
            ],
        }
    }

    pub fn rent_property(&self, property: ObjectId, tenant: Address) -> MoveCall {
        MoveCall {
            target: self.target(PropertyFunction::RentProperty),
            arguments: vec![
                CallArg::Object { id: property },
                CallArg::pure(PureArg::Address(tenant)),
            ],
        }
    }

    /// Struct type tag of property objects, used to filter owned objects.
    pub fn property_struct_type(&self) -> String {
        format!("{}::{PROPERTY_MODULE}::{PROPERTY_STRUCT}", self.package_id)
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
