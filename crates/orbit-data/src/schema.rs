//! Record schema: which models exist and how they relate.
//!
//! A [`Schema`] is built from [`SchemaSettings`], usually deserialized from
//! JSON:
//!
//! ```
//! use orbit_data::schema::Schema;
//!
//! let schema = Schema::from_json(r#"{
//!     "models": {
//!         "planet": {
//!             "attributes": {"name": {"type": "string"}},
//!             "relationships": {"moons": {"type": "hasMany", "model": "moon", "inverse": "planet"}}
//!         },
//!         "moon": {
//!             "relationships": {"planet": {"type": "hasOne", "model": "planet", "inverse": "moons"}}
//!         }
//!     }
//! }"#).unwrap();
//! assert_eq!(schema.version(), 1);
//! assert!(schema.has_model("moon"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::SchemaError;
use crate::record::Record;

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub models: IndexMap<String, ModelDefinition>,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            models: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelDefinition {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub keys: IndexMap<String, KeyDefinition>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeDefinition>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<String, RelationshipDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDefinition {
    #[serde(default)]
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    HasOne,
    HasMany,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    pub r#type: RelationshipKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    version: u32,
    models: IndexMap<String, ModelDefinition>,
}

impl Schema {
    pub fn new(settings: SchemaSettings) -> Self {
        debug!(
            version = settings.version,
            models = settings.models.len(),
            "schema created"
        );
        Self {
            version: settings.version,
            models: settings.models,
        }
    }

    /// Builds a schema from a JSON [`SchemaSettings`] document.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let settings: SchemaSettings = serde_json::from_str(json)?;
        Ok(Self::new(settings))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn models(&self) -> &IndexMap<String, ModelDefinition> {
        &self.models
    }

    pub fn has_model(&self, r#type: &str) -> bool {
        self.models.contains_key(r#type)
    }

    pub fn model(&self, r#type: &str) -> Result<&ModelDefinition, SchemaError> {
        self.models
            .get(r#type)
            .ok_or_else(|| SchemaError::ModelNotDefined(r#type.to_string()))
    }

    pub fn relationship(
        &self,
        r#type: &str,
        relationship: &str,
    ) -> Result<&RelationshipDefinition, SchemaError> {
        self.model(r#type)?
            .relationships
            .get(relationship)
            .ok_or_else(|| SchemaError::RelationshipNotDefined {
                model: r#type.to_string(),
                relationship: relationship.to_string(),
            })
    }

    /// Generates a fresh local id for a record of `type`.
    pub fn generate_id(&self, _type: &str) -> String {
        Uuid::new_v4().to_string()
    }

    /// Assigns a generated id to `record` when it has none.
    pub fn initialize_record(&self, record: &mut Record) {
        if record.id.is_empty() {
            record.id = self.generate_id(&record.r#type);
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(SchemaSettings::default())
    }
}
