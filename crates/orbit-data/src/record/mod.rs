//! Records: loosely typed documents addressed by `{type, id}`.
//!
//! `attributes` and `relationships` are optional and are created lazily by
//! the mutation helpers in [`update`] when something has to be written into
//! them.

mod identity;
pub mod update;

pub use identity::{
    clone_record_identity, equal_record_identities, RecordIdentifier, RecordIdentity,
};
pub use update::{
    update_record_add_to_has_many, update_record_remove_from_has_many,
    update_record_replace_attribute, update_record_replace_has_many,
    update_record_replace_has_one,
};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A record document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub r#type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<IndexMap<String, RecordRelationship>>,
}

impl Record {
    pub fn new(r#type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn identity(&self) -> RecordIdentity {
        clone_record_identity(self)
    }

    pub fn key(&self, name: &str) -> Option<&str> {
        self.keys.as_ref()?.get(name).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref()?.get(name)
    }

    pub fn relationship_data(&self, name: &str) -> Option<&RelationshipData> {
        self.relationships.as_ref()?.get(name)?.data.as_ref()
    }

    /// Returns `true` when `relationships[name].data` holds a value.
    ///
    /// A to-one `null` counts as no data.
    pub fn has_relationship_data(&self, name: &str) -> bool {
        self.relationship_data(name)
            .is_some_and(RelationshipData::is_present)
    }
}

impl From<RecordIdentity> for Record {
    fn from(identity: RecordIdentity) -> Self {
        Self::new(identity.r#type, identity.id)
    }
}

impl RecordIdentifier for Record {
    fn record_type(&self) -> &str {
        &self.r#type
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// A single named relationship of a record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordRelationship {
    /// `None` when `data` is absent; `Some(RelationshipData::One(None))`
    /// for an explicit `null`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<RelationshipData>,
}

/// Linkage held by a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    Many(Vec<RecordIdentity>),
    One(Option<RecordIdentity>),
}

impl RelationshipData {
    pub fn is_present(&self) -> bool {
        !matches!(self, RelationshipData::One(None))
    }
}

// A present `null` must stay distinguishable from a missing member.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
