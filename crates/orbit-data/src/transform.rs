//! Transforms: an identified, ordered batch of record operations.
//!
//! ```
//! use orbit_data::record::{Record, RecordIdentity};
//! use orbit_data::transform::build_transform;
//!
//! let jupiter = RecordIdentity::new("planet", "jupiter");
//! let transform = build_transform(|t| {
//!     vec![
//!         t.add_record(Record::from(jupiter.clone())),
//!         t.replace_attribute(&jupiter, "name", "Jupiter".into()),
//!     ]
//! })
//! .coalesce();
//! assert_eq!(transform.operations.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::coalesce::coalesce_record_operations;
use crate::operation::RecordOperation;
use crate::record::{clone_record_identity, Record, RecordIdentifier};
use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub id: String,
    pub operations: Vec<RecordOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

impl Transform {
    /// Replaces the operations with their coalesced equivalent.
    pub fn coalesce(mut self) -> Self {
        self.operations = coalesce_record_operations(self.operations);
        self
    }
}

/// Factory for [`RecordOperation`]s.
///
/// Identity arguments are reduced to `{type, id}`. With a schema attached,
/// `add_record` assigns ids to records that have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformBuilder<'s> {
    schema: Option<&'s Schema>,
}

impl<'s> TransformBuilder<'s> {
    pub fn new() -> Self {
        Self { schema: None }
    }

    pub fn with_schema(schema: &'s Schema) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    pub fn add_record(&self, mut record: Record) -> RecordOperation {
        if let Some(schema) = self.schema {
            schema.initialize_record(&mut record);
        }
        RecordOperation::AddRecord { record }
    }

    pub fn replace_record(&self, record: Record) -> RecordOperation {
        RecordOperation::ReplaceRecord { record }
    }

    pub fn remove_record(&self, record: &impl RecordIdentifier) -> RecordOperation {
        RecordOperation::RemoveRecord {
            record: clone_record_identity(record),
        }
    }

    pub fn replace_key(
        &self,
        record: &impl RecordIdentifier,
        key: &str,
        value: &str,
    ) -> RecordOperation {
        RecordOperation::ReplaceKey {
            record: clone_record_identity(record),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn replace_attribute(
        &self,
        record: &impl RecordIdentifier,
        attribute: &str,
        value: Value,
    ) -> RecordOperation {
        RecordOperation::ReplaceAttribute {
            record: clone_record_identity(record),
            attribute: attribute.to_string(),
            value,
        }
    }

    pub fn add_to_related_records(
        &self,
        record: &impl RecordIdentifier,
        relationship: &str,
        related_record: &impl RecordIdentifier,
    ) -> RecordOperation {
        RecordOperation::AddToRelatedRecords {
            record: clone_record_identity(record),
            relationship: relationship.to_string(),
            related_record: clone_record_identity(related_record),
        }
    }

    pub fn remove_from_related_records(
        &self,
        record: &impl RecordIdentifier,
        relationship: &str,
        related_record: &impl RecordIdentifier,
    ) -> RecordOperation {
        RecordOperation::RemoveFromRelatedRecords {
            record: clone_record_identity(record),
            relationship: relationship.to_string(),
            related_record: clone_record_identity(related_record),
        }
    }

    pub fn replace_related_records<'r, R>(
        &self,
        record: &impl RecordIdentifier,
        relationship: &str,
        related_records: impl IntoIterator<Item = &'r R>,
    ) -> RecordOperation
    where
        R: RecordIdentifier + 'r,
    {
        RecordOperation::ReplaceRelatedRecords {
            record: clone_record_identity(record),
            relationship: relationship.to_string(),
            related_records: related_records
                .into_iter()
                .map(clone_record_identity)
                .collect(),
        }
    }

    pub fn replace_related_record<R: RecordIdentifier>(
        &self,
        record: &impl RecordIdentifier,
        relationship: &str,
        related_record: Option<&R>,
    ) -> RecordOperation {
        RecordOperation::ReplaceRelatedRecord {
            record: clone_record_identity(record),
            relationship: relationship.to_string(),
            related_record: related_record.map(clone_record_identity),
        }
    }
}

/// Builds a transform with a generated id from the operations returned by
/// `build`.
pub fn build_transform<F>(build: F) -> Transform
where
    F: FnOnce(&TransformBuilder<'_>) -> Vec<RecordOperation>,
{
    build_transform_with(&TransformBuilder::new(), build, None, None)
}

/// Like [`build_transform`], with an explicit builder, options and id.
pub fn build_transform_with<F>(
    builder: &TransformBuilder<'_>,
    build: F,
    options: Option<Map<String, Value>>,
    id: Option<String>,
) -> Transform
where
    F: FnOnce(&TransformBuilder<'_>) -> Vec<RecordOperation>,
{
    Transform {
        id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        operations: build(builder),
        options,
    }
}
