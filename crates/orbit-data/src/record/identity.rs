//! Record identity helpers.
//!
//! A record is addressed by its `{type, id}` pair regardless of which
//! attributes, keys or relationships it carries.

use serde::{Deserialize, Serialize};

/// The `{type, id}` pair that uniquely addresses a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordIdentity {
    pub r#type: String,
    pub id: String,
}

impl RecordIdentity {
    pub fn new(r#type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            id: id.into(),
        }
    }
}

/// Anything that exposes a record `type` and `id`.
pub trait RecordIdentifier {
    fn record_type(&self) -> &str;
    fn record_id(&self) -> &str;
}

impl RecordIdentifier for RecordIdentity {
    fn record_type(&self) -> &str {
        &self.r#type
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Copies only the `type` and `id` of `identity`.
///
/// Keys, attributes and relationships of a full record are not carried over,
/// so the result is safe to store in identity-only slots.
pub fn clone_record_identity<R: RecordIdentifier + ?Sized>(identity: &R) -> RecordIdentity {
    RecordIdentity::new(identity.record_type(), identity.record_id())
}

/// Compares two optional identities.
///
/// Two absent identities are equal; an absent identity never equals a
/// present one.
pub fn equal_record_identities<A, B>(a: Option<&A>, b: Option<&B>) -> bool
where
    A: RecordIdentifier + ?Sized,
    B: RecordIdentifier + ?Sized,
{
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.record_type() == b.record_type() && a.record_id() == b.record_id(),
        _ => false,
    }
}
