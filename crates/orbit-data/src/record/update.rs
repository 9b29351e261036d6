//! In-place record mutations used when one operation is folded into another.
//!
//! None of these fail: missing `attributes`, `relationships` or relationship
//! entries are created on the way down.

use serde_json::Value;

use super::{
    clone_record_identity, equal_record_identities, Record, RecordIdentity, RecordRelationship,
    RelationshipData,
};

/// Get-or-create `record.relationships[relationship]`.
fn relationship_mut<'a>(record: &'a mut Record, relationship: &str) -> &'a mut RecordRelationship {
    record
        .relationships
        .get_or_insert_with(Default::default)
        .entry(relationship.to_string())
        .or_default()
}

pub fn update_record_replace_attribute(record: &mut Record, attribute: &str, value: Value) {
    record
        .attributes
        .get_or_insert_with(Default::default)
        .insert(attribute.to_string(), value);
}

pub fn update_record_replace_has_one(
    record: &mut Record,
    relationship: &str,
    related_record: Option<&RecordIdentity>,
) {
    relationship_mut(record, relationship).data = Some(RelationshipData::One(
        related_record.map(clone_record_identity),
    ));
}

pub fn update_record_replace_has_many(
    record: &mut Record,
    relationship: &str,
    related_records: &[RecordIdentity],
) {
    relationship_mut(record, relationship).data = Some(RelationshipData::Many(
        related_records.iter().map(clone_record_identity).collect(),
    ));
}

/// Appends `related_record` to the to-many data, starting from an empty list
/// when there is none. Entries are not deduplicated.
pub fn update_record_add_to_has_many(
    record: &mut Record,
    relationship: &str,
    related_record: &RecordIdentity,
) {
    let rel = relationship_mut(record, relationship);
    let mut data = match rel.data.take() {
        Some(RelationshipData::Many(data)) => data,
        // A to-one value cannot be appended to.
        _ => Vec::new(),
    };
    data.push(clone_record_identity(related_record));
    rel.data = Some(RelationshipData::Many(data));
}

/// Removes the first entry equal to `related_record`. No-op when the
/// relationship has no to-many data.
pub fn update_record_remove_from_has_many(
    record: &mut Record,
    relationship: &str,
    related_record: &RecordIdentity,
) {
    let Some(RelationshipData::Many(data)) = record
        .relationships
        .as_mut()
        .and_then(|rels| rels.get_mut(relationship))
        .and_then(|rel| rel.data.as_mut())
    else {
        return;
    };
    if let Some(pos) = data
        .iter()
        .position(|r| equal_record_identities(Some(r), Some(related_record)))
    {
        data.remove(pos);
    }
}
