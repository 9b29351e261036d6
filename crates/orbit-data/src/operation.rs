//! Record operations.
//!
//! The JSON form is tagged by `op` with camelCase payload members, e.g.
//! `{"op": "replaceAttribute", "record": {...}, "attribute": "name", "value": "Jim"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{Record, RecordIdentifier, RecordIdentity};

/// A single mutation of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RecordOperation {
    AddRecord {
        record: Record,
    },
    ReplaceRecord {
        record: Record,
    },
    RemoveRecord {
        record: RecordIdentity,
    },
    ReplaceKey {
        record: RecordIdentity,
        key: String,
        value: String,
    },
    ReplaceAttribute {
        record: RecordIdentity,
        attribute: String,
        value: Value,
    },
    AddToRelatedRecords {
        record: RecordIdentity,
        relationship: String,
        related_record: RecordIdentity,
    },
    RemoveFromRelatedRecords {
        record: RecordIdentity,
        relationship: String,
        related_record: RecordIdentity,
    },
    ReplaceRelatedRecords {
        record: RecordIdentity,
        relationship: String,
        related_records: Vec<RecordIdentity>,
    },
    ReplaceRelatedRecord {
        record: RecordIdentity,
        relationship: String,
        related_record: Option<RecordIdentity>,
    },
}

impl RecordOperation {
    /// Returns the `op` tag of the JSON form.
    pub fn op_name(&self) -> &'static str {
        match self {
            RecordOperation::AddRecord { .. } => "addRecord",
            RecordOperation::ReplaceRecord { .. } => "replaceRecord",
            RecordOperation::RemoveRecord { .. } => "removeRecord",
            RecordOperation::ReplaceKey { .. } => "replaceKey",
            RecordOperation::ReplaceAttribute { .. } => "replaceAttribute",
            RecordOperation::AddToRelatedRecords { .. } => "addToRelatedRecords",
            RecordOperation::RemoveFromRelatedRecords { .. } => "removeFromRelatedRecords",
            RecordOperation::ReplaceRelatedRecords { .. } => "replaceRelatedRecords",
            RecordOperation::ReplaceRelatedRecord { .. } => "replaceRelatedRecord",
        }
    }

    /// `replaceAttribute`, `replaceRelatedRecord` and `replaceRelatedRecords`
    /// touch exactly one named field.
    pub fn is_replace_field_op(&self) -> bool {
        matches!(
            self,
            RecordOperation::ReplaceAttribute { .. }
                | RecordOperation::ReplaceRelatedRecord { .. }
                | RecordOperation::ReplaceRelatedRecords { .. }
        )
    }

    /// `addRecord` and `replaceRecord` carry a full record payload.
    pub fn is_whole_record_op(&self) -> bool {
        matches!(
            self,
            RecordOperation::AddRecord { .. } | RecordOperation::ReplaceRecord { .. }
        )
    }

    /// The full record payload of `addRecord` / `replaceRecord`.
    pub fn record_payload(&self) -> Option<&Record> {
        match self {
            RecordOperation::AddRecord { record } | RecordOperation::ReplaceRecord { record } => {
                Some(record)
            }
            _ => None,
        }
    }
}

impl RecordIdentifier for RecordOperation {
    fn record_type(&self) -> &str {
        match self {
            RecordOperation::AddRecord { record } | RecordOperation::ReplaceRecord { record } => {
                record.record_type()
            }
            RecordOperation::RemoveRecord { record }
            | RecordOperation::ReplaceKey { record, .. }
            | RecordOperation::ReplaceAttribute { record, .. }
            | RecordOperation::AddToRelatedRecords { record, .. }
            | RecordOperation::RemoveFromRelatedRecords { record, .. }
            | RecordOperation::ReplaceRelatedRecords { record, .. }
            | RecordOperation::ReplaceRelatedRecord { record, .. } => record.record_type(),
        }
    }

    fn record_id(&self) -> &str {
        match self {
            RecordOperation::AddRecord { record } | RecordOperation::ReplaceRecord { record } => {
                record.record_id()
            }
            RecordOperation::RemoveRecord { record }
            | RecordOperation::ReplaceKey { record, .. }
            | RecordOperation::ReplaceAttribute { record, .. }
            | RecordOperation::AddToRelatedRecords { record, .. }
            | RecordOperation::RemoveFromRelatedRecords { record, .. }
            | RecordOperation::ReplaceRelatedRecords { record, .. }
            | RecordOperation::ReplaceRelatedRecord { record, .. } => record.record_id(),
        }
    }
}
