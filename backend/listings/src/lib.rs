//! Nyumba listings: builds, submits and reads property records kept by the
//! on-chain `property` contract.
//!
//! UI code talks to [`PropertyService`]. Writes are encoded by
//! [`CallEncoder`] and handed to whatever wallet the host published through
//! a [`SignerSlot`]; reads go through [`ListingQuery`] and are decoded into
//! [`ListingRecord`]s.

pub mod api;
pub mod call;
pub mod config;
pub mod decode;
pub mod errors;
pub mod query;
pub mod rpc;
pub mod service;
pub mod session;
pub mod types;

pub use call::{CallArg, CallEncoder, MoveCall, PureArg};
pub use config::{Config, Network};
pub use decode::Decoded;
pub use errors::{ListingError, Result};
pub use query::ListingQuery;
pub use service::PropertyService;
pub use session::{Session, SessionState, Signer, SignerSlot};
pub use types::{
    parse_price, Address, Listing, ListingRecord, ListingRequest, ObjectId, SubmissionResult,
};
