//! Coalescing of record operations.
//!
//! [`coalesce_record_operations`] reduces an ordered list of operations to an
//! equivalent, usually shorter list. Surviving operations keep their relative
//! order; an operation is only ever dropped or has a later operation's effect
//! folded into it.
//!
//! Folding of anything but `replaceAttribute` is only allowed while every
//! operation between the two compared ones has already been absorbed, so
//! relationship operations never move past other surviving operations.

use tracing::{debug, trace};

use crate::operation::RecordOperation;
use crate::record::{
    clone_record_identity, equal_record_identities, update_record_add_to_has_many,
    update_record_remove_from_has_many, update_record_replace_attribute,
    update_record_replace_has_many, update_record_replace_has_one, Record,
};

/// What to do with a compared pair of operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Both operations survive unmodified.
    Keep,
    /// The earlier operation is redundant.
    DropSuperceded,
    /// The operations cancel each other out.
    DropBoth,
    /// The earlier operation is replaced by the given one, which carries the
    /// effect of both; the later operation is dropped.
    Fold(RecordOperation),
}

/// Decides how `superceding` (the later operation) combines with
/// `superceded` (the earlier one).
///
/// `consecutive_ops` tells whether every operation between the two has
/// already been absorbed. Operations on different records always yield
/// [`MergeOutcome::Keep`].
pub fn merge_operations(
    superceded: &RecordOperation,
    superceding: &RecordOperation,
    consecutive_ops: bool,
) -> MergeOutcome {
    merge(superceded, superceding, false, consecutive_ops)
}

fn merge(
    superceded: &RecordOperation,
    superceding: &RecordOperation,
    superceding_dropped: bool,
    consecutive_ops: bool,
) -> MergeOutcome {
    if !equal_record_identities(Some(superceded), Some(superceding)) {
        return MergeOutcome::Keep;
    }

    if let RecordOperation::RemoveRecord { .. } = superceding {
        return match superceded {
            RecordOperation::AddRecord { .. } => MergeOutcome::DropBoth,
            _ => MergeOutcome::DropSuperceded,
        };
    }

    let attribute_replace = matches!(superceding, RecordOperation::ReplaceAttribute { .. });
    if superceding_dropped || !(consecutive_ops || attribute_replace) {
        return MergeOutcome::Keep;
    }

    fold(superceded, superceding)
}

fn fold(superceded: &RecordOperation, superceding: &RecordOperation) -> MergeOutcome {
    use crate::operation::RecordOperation as Op;

    if superceded.is_replace_field_op() && superceding.is_replace_field_op() {
        if replaces_same_field(superceded, superceding) {
            return MergeOutcome::DropSuperceded;
        }
        let mut record = Record::from(clone_record_identity(superceded));
        apply_field_replace(&mut record, superceded);
        apply_field_replace(&mut record, superceding);
        return MergeOutcome::Fold(Op::ReplaceRecord { record });
    }

    if superceding.is_replace_field_op() {
        return match superceded.record_payload() {
            Some(payload) => {
                let mut record = payload.clone();
                apply_field_replace(&mut record, superceding);
                MergeOutcome::Fold(with_payload(superceded, record))
            }
            None => MergeOutcome::Keep,
        };
    }

    match (superceded, superceding) {
        (
            Op::AddRecord { record } | Op::ReplaceRecord { record },
            Op::AddToRelatedRecords {
                relationship,
                related_record,
                ..
            },
        ) => {
            // A replaced record without data for the relationship does not
            // imply an empty collection.
            if matches!(superceded, Op::ReplaceRecord { .. })
                && !record.has_relationship_data(relationship)
            {
                return MergeOutcome::Keep;
            }
            let mut record = record.clone();
            update_record_add_to_has_many(&mut record, relationship, related_record);
            MergeOutcome::Fold(with_payload(superceded, record))
        }
        (
            Op::AddToRelatedRecords {
                relationship: added_to,
                related_record: added,
                ..
            },
            Op::RemoveFromRelatedRecords {
                relationship,
                related_record,
                ..
            },
        ) => {
            let same_related = equal_record_identities(Some(added), Some(related_record));
            if added_to == relationship && same_related {
                MergeOutcome::DropBoth
            } else {
                MergeOutcome::Keep
            }
        }
        (
            Op::AddRecord { record } | Op::ReplaceRecord { record },
            Op::RemoveFromRelatedRecords {
                relationship,
                related_record,
                ..
            },
        ) if record.has_relationship_data(relationship) => {
            let mut record = record.clone();
            update_record_remove_from_has_many(&mut record, relationship, related_record);
            MergeOutcome::Fold(with_payload(superceded, record))
        }
        _ => MergeOutcome::Keep,
    }
}

fn replaces_same_field(a: &RecordOperation, b: &RecordOperation) -> bool {
    use crate::operation::RecordOperation as Op;

    match (a, b) {
        (Op::ReplaceAttribute { attribute: a, .. }, Op::ReplaceAttribute { attribute: b, .. }) => {
            a == b
        }
        (
            Op::ReplaceRelatedRecord { relationship: a, .. },
            Op::ReplaceRelatedRecord { relationship: b, .. },
        )
        | (
            Op::ReplaceRelatedRecords { relationship: a, .. },
            Op::ReplaceRelatedRecords { relationship: b, .. },
        ) => a == b,
        _ => false,
    }
}

/// Writes the effect of a field-replace operation into `record`. Other
/// operations have no field effect.
fn apply_field_replace(record: &mut Record, op: &RecordOperation) {
    match op {
        RecordOperation::ReplaceAttribute {
            attribute, value, ..
        } => update_record_replace_attribute(record, attribute, value.clone()),
        RecordOperation::ReplaceRelatedRecord {
            relationship,
            related_record,
            ..
        } => update_record_replace_has_one(record, relationship, related_record.as_ref()),
        RecordOperation::ReplaceRelatedRecords {
            relationship,
            related_records,
            ..
        } => update_record_replace_has_many(record, relationship, related_records),
        _ => {}
    }
}

/// Same kind of whole-record operation as `op`, carrying `record`.
fn with_payload(op: &RecordOperation, record: Record) -> RecordOperation {
    match op {
        RecordOperation::AddRecord { .. } => RecordOperation::AddRecord { record },
        _ => RecordOperation::ReplaceRecord { record },
    }
}

struct Slot {
    op: RecordOperation,
    dropped: bool,
}

/// Coalesces `operations`, returning the surviving (possibly rewritten)
/// operations in their original relative order.
///
/// Runs in O(n²) comparisons; only pairs on the same record can interact.
pub fn coalesce_record_operations(operations: Vec<RecordOperation>) -> Vec<RecordOperation> {
    let total = operations.len();
    let mut slots: Vec<Slot> = operations
        .into_iter()
        .map(|op| Slot { op, dropped: false })
        .collect();

    for i in 0..slots.len() {
        let (head, tail) = slots.split_at_mut(i + 1);
        // An already dropped operation is still compared once; a fold into it
        // drops the later operation along with it.
        let current = &mut head[i];

        let mut consecutive_ops = true;
        for (offset, later) in tail.iter_mut().enumerate() {
            let outcome = merge(&current.op, &later.op, later.dropped, consecutive_ops);
            if outcome != MergeOutcome::Keep {
                trace!(
                    superceded = i,
                    superceding = i + 1 + offset,
                    superceded_op = current.op.op_name(),
                    superceding_op = later.op.op_name(),
                    ?outcome,
                    "merged record operations"
                );
            }
            match outcome {
                MergeOutcome::Keep => {}
                MergeOutcome::DropSuperceded => current.dropped = true,
                MergeOutcome::DropBoth => {
                    current.dropped = true;
                    later.dropped = true;
                }
                MergeOutcome::Fold(op) => {
                    current.op = op;
                    later.dropped = true;
                }
            }

            if current.dropped {
                break;
            }
            if !later.dropped {
                consecutive_ops = false;
            }
        }
    }

    let coalesced: Vec<RecordOperation> = slots
        .into_iter()
        .filter(|slot| !slot.dropped)
        .map(|slot| slot.op)
        .collect();
    debug!(
        before = total,
        after = coalesced.len(),
        "coalesced record operations"
    );
    coalesced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordIdentity, RelationshipData};
    use serde_json::json;

    fn contact() -> RecordIdentity {
        RecordIdentity::new("contact", "1234")
    }

    fn replace_attribute(record: RecordIdentity, attribute: &str, value: &str) -> RecordOperation {
        RecordOperation::ReplaceAttribute {
            record,
            attribute: attribute.into(),
            value: json!(value),
        }
    }

    #[test]
    fn different_records_are_kept() {
        let a = replace_attribute(contact(), "name", "Joe");
        let b = RecordOperation::RemoveRecord {
            record: RecordIdentity::new("contact", "5678"),
        };
        assert_eq!(merge_operations(&a, &b, true), MergeOutcome::Keep);
        assert_eq!(merge_operations(&b, &a, true), MergeOutcome::Keep);
    }

    #[test]
    fn remove_record_drops_superceded() {
        let remove = RecordOperation::RemoveRecord { record: contact() };
        let attr = replace_attribute(contact(), "name", "Joe");
        assert_eq!(merge_operations(&attr, &remove, false), MergeOutcome::DropSuperceded);
        assert_eq!(merge_operations(&remove, &remove, false), MergeOutcome::DropSuperceded);
    }

    #[test]
    fn add_then_remove_cancels() {
        let add = RecordOperation::AddRecord {
            record: Record::from(contact()),
        };
        let remove = RecordOperation::RemoveRecord { record: contact() };
        assert_eq!(merge_operations(&add, &remove, false), MergeOutcome::DropBoth);
    }

    #[test]
    fn same_attribute_drops_superceded() {
        let a = replace_attribute(contact(), "name", "Joe");
        let b = replace_attribute(contact(), "name", "Jim");
        assert_eq!(merge_operations(&a, &b, false), MergeOutcome::DropSuperceded);
    }

    #[test]
    fn same_relationship_replace_drops_superceded() {
        let a = RecordOperation::ReplaceRelatedRecord {
            record: contact(),
            relationship: "address".into(),
            related_record: Some(RecordIdentity::new("address", "a")),
        };
        let b = RecordOperation::ReplaceRelatedRecord {
            record: contact(),
            relationship: "address".into(),
            related_record: None,
        };
        assert_eq!(merge_operations(&a, &b, true), MergeOutcome::DropSuperceded);
        // Not consecutive and not an attribute replace.
        assert_eq!(merge_operations(&a, &b, false), MergeOutcome::Keep);
    }

    #[test]
    fn different_fields_fold_into_replace_record() {
        let a = replace_attribute(contact(), "name", "Joe");
        let address = RecordIdentity::new("address", "a");
        let b = RecordOperation::ReplaceRelatedRecord {
            record: contact(),
            relationship: "address".into(),
            related_record: Some(address.clone()),
        };
        let MergeOutcome::Fold(RecordOperation::ReplaceRecord { record }) =
            merge_operations(&a, &b, true)
        else {
            panic!("expected a replaceRecord fold");
        };
        assert_eq!(record.identity(), contact());
        assert_eq!(record.attribute("name"), Some(&json!("Joe")));
        assert_eq!(
            record.relationship_data("address"),
            Some(&RelationshipData::One(Some(address)))
        );
    }

    #[test]
    fn field_replace_folds_into_add_record() {
        let add = RecordOperation::AddRecord {
            record: Record::from(contact()),
        };
        let attr = replace_attribute(contact(), "name", "Jim");
        let MergeOutcome::Fold(RecordOperation::AddRecord { record }) =
            merge_operations(&add, &attr, false)
        else {
            panic!("expected an addRecord fold");
        };
        assert_eq!(record.attribute("name"), Some(&json!("Jim")));
    }

    #[test]
    fn add_to_related_requires_existing_data_on_replace_record() {
        let replace = RecordOperation::ReplaceRecord {
            record: Record::from(contact()),
        };
        let add_to = RecordOperation::AddToRelatedRecords {
            record: contact(),
            relationship: "phoneNumbers".into(),
            related_record: RecordIdentity::new("phoneNumber", "p"),
        };
        assert_eq!(merge_operations(&replace, &add_to, true), MergeOutcome::Keep);

        let mut record = Record::from(contact());
        update_record_replace_has_many(&mut record, "phoneNumbers", &[]);
        let replace = RecordOperation::ReplaceRecord { record };
        let MergeOutcome::Fold(RecordOperation::ReplaceRecord { record }) =
            merge_operations(&replace, &add_to, true)
        else {
            panic!("expected a replaceRecord fold");
        };
        assert_eq!(
            record.relationship_data("phoneNumbers"),
            Some(&RelationshipData::Many(vec![RecordIdentity::new("phoneNumber", "p")]))
        );
    }

    #[test]
    fn add_to_and_remove_from_same_related_record_cancel() {
        let phone = RecordIdentity::new("phoneNumber", "p");
        let add_to = RecordOperation::AddToRelatedRecords {
            record: contact(),
            relationship: "phoneNumbers".into(),
            related_record: phone.clone(),
        };
        let remove_from = RecordOperation::RemoveFromRelatedRecords {
            record: contact(),
            relationship: "phoneNumbers".into(),
            related_record: phone,
        };
        assert_eq!(merge_operations(&add_to, &remove_from, true), MergeOutcome::DropBoth);

        let other = RecordOperation::RemoveFromRelatedRecords {
            record: contact(),
            relationship: "phoneNumbers".into(),
            related_record: RecordIdentity::new("phoneNumber", "q"),
        };
        assert_eq!(merge_operations(&add_to, &other, true), MergeOutcome::Keep);
    }

    #[test]
    fn remove_from_related_folds_into_record_with_data() {
        let phone = RecordIdentity::new("phoneNumber", "p");
        let mut record = Record::from(contact());
        update_record_replace_has_many(&mut record, "phoneNumbers", &[phone.clone()]);
        let add = RecordOperation::AddRecord { record };
        let remove_from = RecordOperation::RemoveFromRelatedRecords {
            record: contact(),
            relationship: "phoneNumbers".into(),
            related_record: phone,
        };
        let MergeOutcome::Fold(RecordOperation::AddRecord { record }) =
            merge_operations(&add, &remove_from, true)
        else {
            panic!("expected an addRecord fold");
        };
        assert_eq!(
            record.relationship_data("phoneNumbers"),
            Some(&RelationshipData::Many(vec![]))
        );

        let bare = RecordOperation::AddRecord {
            record: Record::from(contact()),
        };
        assert_eq!(merge_operations(&bare, &remove_from, true), MergeOutcome::Keep);
    }

    #[test]
    fn replace_key_is_only_absorbed_by_removal() {
        let key = RecordOperation::ReplaceKey {
            record: contact(),
            key: "remoteId".into(),
            value: "r1".into(),
        };
        let add = RecordOperation::AddRecord {
            record: Record::from(contact()),
        };
        assert_eq!(merge_operations(&add, &key, true), MergeOutcome::Keep);
        assert_eq!(merge_operations(&key, &add, true), MergeOutcome::Keep);
        let remove = RecordOperation::RemoveRecord { record: contact() };
        assert_eq!(merge_operations(&key, &remove, true), MergeOutcome::DropSuperceded);
    }

    #[test]
    fn dropped_removal_still_removes_earlier_operations() {
        let add = RecordOperation::AddRecord {
            record: Record::from(contact()),
        };
        let other = RecordOperation::RemoveRecord {
            record: RecordIdentity::new("contact", "5678"),
        };
        let rel = RecordOperation::ReplaceRelatedRecord {
            record: contact(),
            relationship: "address".into(),
            related_record: None,
        };
        let remove = RecordOperation::RemoveRecord { record: contact() };
        let coalesced = coalesce_record_operations(vec![add, other.clone(), rel, remove]);
        assert_eq!(coalesced, vec![other]);
    }

    #[test]
    fn dropped_field_replace_still_folds_its_neighbour() {
        let address = RecordIdentity::new("address", "a");
        let add = RecordOperation::AddRecord {
            record: Record::from(address.clone()),
        };
        let other = RecordOperation::RemoveRecord {
            record: RecordIdentity::new("contact", "b"),
        };
        let street = replace_attribute(address.clone(), "street", "x");
        let rel = RecordOperation::ReplaceRelatedRecord {
            record: address,
            relationship: "contact".into(),
            related_record: Some(RecordIdentity::new("contact", "c")),
        };
        let coalesced = coalesce_record_operations(vec![add, other.clone(), street, rel]);
        assert_eq!(coalesced.len(), 2);
        assert!(matches!(coalesced[0], RecordOperation::AddRecord { .. }));
        assert_eq!(coalesced[1], other);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(coalesce_record_operations(Vec::new()).is_empty());
    }
}
