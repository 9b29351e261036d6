//! Query expressions and their builder.
//!
//! ```
//! use orbit_data::query::{build_query, FilterOp, FilterSpecifier};
//!
//! let query = build_query(|q| {
//!     q.find_records("planet")
//!         .filter(FilterSpecifier::attribute("classification", FilterOp::Equal, "gas giant".into()))
//!         .sort(["-name"])
//!         .page(0, 10)
//! });
//! assert_eq!(query.expression.op_name(), "findRecords");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::record::{clone_record_identity, RecordIdentifier, RecordIdentity};

// ── Specifiers ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SortSpecifier {
    Attribute { attribute: String, order: SortOrder },
}

impl From<&str> for SortSpecifier {
    /// `"name"` sorts ascending, `"-name"` descending.
    fn from(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(attribute) => SortSpecifier::Attribute {
                attribute: attribute.to_string(),
                order: SortOrder::Descending,
            },
            None => SortSpecifier::Attribute {
                attribute: spec.to_string(),
                order: SortOrder::Ascending,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOp {
    Equal,
    Gt,
    Lt,
    Gte,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilterSpecifier {
    Attribute {
        attribute: String,
        op: FilterOp,
        value: Value,
    },
}

impl FilterSpecifier {
    pub fn attribute(attribute: &str, op: FilterOp, value: Value) -> Self {
        FilterSpecifier::Attribute {
            attribute: attribute.to_string(),
            op,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageSpecifier {
    OffsetLimit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        offset: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },
}

// ── Expressions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum QueryExpression {
    FindRecord {
        record: RecordIdentity,
    },
    FindRecords {
        r#type: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        filter: Vec<FilterSpecifier>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sort: Vec<SortSpecifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page: Option<PageSpecifier>,
    },
    FindRelatedRecord {
        record: RecordIdentity,
        relationship: String,
    },
    FindRelatedRecords {
        record: RecordIdentity,
        relationship: String,
    },
}

impl QueryExpression {
    pub fn op_name(&self) -> &'static str {
        match self {
            QueryExpression::FindRecord { .. } => "findRecord",
            QueryExpression::FindRecords { .. } => "findRecords",
            QueryExpression::FindRelatedRecord { .. } => "findRelatedRecord",
            QueryExpression::FindRelatedRecords { .. } => "findRelatedRecords",
        }
    }
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Chainable `findRecords` term.
#[derive(Debug, Clone, PartialEq)]
pub struct FindRecordsTerm {
    r#type: String,
    filter: Vec<FilterSpecifier>,
    sort: Vec<SortSpecifier>,
    page: Option<PageSpecifier>,
}

impl FindRecordsTerm {
    pub fn filter(mut self, filter: FilterSpecifier) -> Self {
        self.filter.push(filter);
        self
    }

    pub fn sort<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SortSpecifier>,
    {
        self.sort.extend(specs.into_iter().map(Into::into));
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.page = Some(PageSpecifier::OffsetLimit {
            offset: Some(offset),
            limit: Some(limit),
        });
        self
    }
}

impl From<FindRecordsTerm> for QueryExpression {
    fn from(term: FindRecordsTerm) -> Self {
        QueryExpression::FindRecords {
            r#type: term.r#type,
            filter: term.filter,
            sort: term.sort,
            page: term.page,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn find_record(&self, record: &impl RecordIdentifier) -> QueryExpression {
        QueryExpression::FindRecord {
            record: clone_record_identity(record),
        }
    }

    pub fn find_records(&self, r#type: &str) -> FindRecordsTerm {
        FindRecordsTerm {
            r#type: r#type.to_string(),
            filter: Vec::new(),
            sort: Vec::new(),
            page: None,
        }
    }

    pub fn find_related_record(
        &self,
        record: &impl RecordIdentifier,
        relationship: &str,
    ) -> QueryExpression {
        QueryExpression::FindRelatedRecord {
            record: clone_record_identity(record),
            relationship: relationship.to_string(),
        }
    }

    pub fn find_related_records(
        &self,
        record: &impl RecordIdentifier,
        relationship: &str,
    ) -> QueryExpression {
        QueryExpression::FindRelatedRecords {
            record: clone_record_identity(record),
            relationship: relationship.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: String,
    pub expression: QueryExpression,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

pub fn build_query<F, E>(build: F) -> Query
where
    F: FnOnce(&QueryBuilder) -> E,
    E: Into<QueryExpression>,
{
    build_query_with(build, None, None)
}

pub fn build_query_with<F, E>(
    build: F,
    options: Option<Map<String, Value>>,
    id: Option<String>,
) -> Query
where
    F: FnOnce(&QueryBuilder) -> E,
    E: Into<QueryExpression>,
{
    Query {
        id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        expression: build(&QueryBuilder).into(),
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sort_shorthand_sets_order() {
        assert_eq!(
            SortSpecifier::from("-name"),
            SortSpecifier::Attribute {
                attribute: "name".into(),
                order: SortOrder::Descending
            }
        );
        assert_eq!(
            SortSpecifier::from("name"),
            SortSpecifier::Attribute {
                attribute: "name".into(),
                order: SortOrder::Ascending
            }
        );
    }

    #[test]
    fn find_records_term_serializes() {
        let query = build_query_with(
            |q| {
                q.find_records("planet")
                    .filter(FilterSpecifier::attribute("mass", FilterOp::Gte, json!(10)))
                    .sort(["-name", "order"])
                    .page(5, 10)
            },
            None,
            Some("q1".into()),
        );
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "id": "q1",
                "expression": {
                    "op": "findRecords",
                    "type": "planet",
                    "filter": [{"kind": "attribute", "attribute": "mass", "op": "gte", "value": 10}],
                    "sort": [
                        {"kind": "attribute", "attribute": "name", "order": "descending"},
                        {"kind": "attribute", "attribute": "order", "order": "ascending"}
                    ],
                    "page": {"kind": "offsetLimit", "offset": 5, "limit": 10}
                }
            })
        );
    }

    #[test]
    fn record_terms_use_identities() {
        let earth = RecordIdentity::new("planet", "earth");
        let query = build_query(|q| q.find_related_records(&earth, "moons"));
        assert_eq!(
            query.expression,
            QueryExpression::FindRelatedRecords {
                record: earth.clone(),
                relationship: "moons".into()
            }
        );
        assert_eq!(
            build_query(|q| q.find_record(&earth)).expression.op_name(),
            "findRecord"
        );
        assert_eq!(
            build_query(|q| q.find_related_record(&earth, "sun")).expression.op_name(),
            "findRelatedRecord"
        );
    }

    #[test]
    fn bare_find_records_decodes_with_defaults() {
        let expression: QueryExpression =
            serde_json::from_value(json!({"op": "findRecords", "type": "moon"})).unwrap();
        assert_eq!(expression, QueryExpression::from(QueryBuilder.find_records("moon")));
    }
}
