//! JSON codec for record operations.
//!
//! Operations use the `{"op": "<kind>", ...}` form. An unknown `op` tag is a
//! decode error.

use serde::Deserialize;
use serde_json::Value;

use crate::error::OperationError;
use crate::operation::RecordOperation;

/// Decodes a single operation.
pub fn from_json(value: &Value) -> Result<RecordOperation, OperationError> {
    Ok(RecordOperation::deserialize(value)?)
}

/// Decodes a JSON array of operations.
pub fn from_json_operations(value: &Value) -> Result<Vec<RecordOperation>, OperationError> {
    value
        .as_array()
        .ok_or(OperationError::NotAnArray)?
        .iter()
        .map(from_json)
        .collect()
}

/// Parses a JSON string holding an array of operations.
pub fn parse_operations(json: &str) -> Result<Vec<RecordOperation>, OperationError> {
    let value: Value = serde_json::from_str(json)?;
    from_json_operations(&value)
}

pub fn to_json(op: &RecordOperation) -> Value {
    // Serializing these types into a `Value` cannot fail: every map key is a
    // string.
    serde_json::to_value(op).unwrap_or(Value::Null)
}

pub fn to_json_operations(ops: &[RecordOperation]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}
