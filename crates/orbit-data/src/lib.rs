//! orbit-data — records, record operations and their coalescing.
//!
//! - [`record`]: record documents, identities and in-place record mutations.
//! - [`operation`]: the closed set of record operations.
//! - [`coalesce`]: reduction of an operation list to a minimal equivalent one.
//! - [`transform`] / [`query`]: builders for write and read requests.
//! - [`schema`], [`key_map`]: model definitions and key/id mapping.
//!
//! ```
//! use orbit_data::codec::parse_operations;
//! use orbit_data::coalesce::coalesce_record_operations;
//!
//! let ops = parse_operations(r#"[
//!     {"op": "replaceAttribute", "record": {"type": "contact", "id": "1"}, "attribute": "name", "value": "Joe"},
//!     {"op": "replaceAttribute", "record": {"type": "contact", "id": "1"}, "attribute": "name", "value": "Jim"}
//! ]"#).unwrap();
//! let coalesced = coalesce_record_operations(ops);
//! assert_eq!(coalesced.len(), 1);
//! ```

pub mod cli;
pub mod codec;
pub mod coalesce;
pub mod error;
pub mod key_map;
pub mod operation;
pub mod query;
pub mod record;
pub mod schema;
pub mod transform;

pub use coalesce::{coalesce_record_operations, merge_operations, MergeOutcome};
pub use error::{OperationError, SchemaError};
pub use operation::RecordOperation;
pub use record::{clone_record_identity, equal_record_identities, Record, RecordIdentity};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
