//! Maps between local record ids and the keys other systems know them by.

use std::collections::HashMap;

use tracing::trace;

use crate::record::Record;

// type -> key name -> from -> to
type Index = HashMap<String, HashMap<String, HashMap<String, String>>>;

#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    ids_to_keys: Index,
    keys_to_ids: Index,
}

fn lookup<'a>(index: &'a Index, r#type: &str, key_name: &str, from: &str) -> Option<&'a str> {
    index
        .get(r#type)?
        .get(key_name)?
        .get(from)
        .map(String::as_str)
}

fn insert(index: &mut Index, r#type: &str, key_name: &str, from: &str, to: &str) {
    index
        .entry(r#type.to_string())
        .or_default()
        .entry(key_name.to_string())
        .or_default()
        .insert(from.to_string(), to.to_string());
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.ids_to_keys.clear();
        self.keys_to_ids.clear();
    }

    /// Returns the id of the record of `type` whose `key_name` key is `key_value`.
    pub fn key_to_id(&self, r#type: &str, key_name: &str, key_value: &str) -> Option<&str> {
        lookup(&self.keys_to_ids, r#type, key_name, key_value)
    }

    /// Returns the `key_name` key of the record of `type` with the given id.
    pub fn id_to_key(&self, r#type: &str, key_name: &str, id: &str) -> Option<&str> {
        lookup(&self.ids_to_keys, r#type, key_name, id)
    }

    /// Indexes every key of `record`. Records without an id or keys are
    /// ignored.
    pub fn push_record(&mut self, record: &Record) {
        let Some(keys) = record.keys.as_ref() else {
            return;
        };
        if record.id.is_empty() {
            return;
        }
        for (key_name, key_value) in keys {
            if key_value.is_empty() {
                continue;
            }
            insert(&mut self.ids_to_keys, &record.r#type, key_name, &record.id, key_value);
            insert(&mut self.keys_to_ids, &record.r#type, key_name, key_value, &record.id);
        }
        trace!(record_type = %record.r#type, id = %record.id, "pushed record keys");
    }

    /// Resolves an id from the first of `keys` that is known.
    pub fn id_from_keys<'a, I>(&self, r#type: &str, keys: I) -> Option<&str>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        keys.into_iter()
            .find_map(|(key_name, key_value)| self.key_to_id(r#type, key_name, key_value))
    }
}
