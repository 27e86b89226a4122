//! Row and streaming types for query results.

use crate::error::AppError;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::pin::Pin;

/// Parameters for Cypher queries.
///
/// A map of parameter names to JSON values that can be passed to queries.
pub type Params = HashMap<String, JsonValue>;

/// A stream of rows from a query result.
///
/// Rows are fetched on-demand, not loaded all at once.
pub type RowStream<'a> = Pin<Box<dyn Stream<Item = Result<Row, AppError>> + Send + 'a>>;

/// A single row from a query result.
///
/// Contains column values as JSON, with typed extraction via [`Row::get`].
/// Serializes as a plain JSON object, which is how rows are handed to the
/// answer prompt of the Cypher QA chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    data: HashMap<String, JsonValue>,
}

impl Row {
    /// Creates a new row from a map of column names to values.
    pub fn new(data: HashMap<String, JsonValue>) -> Self {
        Self { data }
    }

    /// Gets a value from the row by column name, deserializing to the requested type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not found or if deserialization fails.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, AppError> {
        self.data
            .get(key)
            .ok_or_else(|| AppError::Internal(format!("column not found: {}", key)))
            .and_then(|v| {
                serde_json::from_value(v.clone()).map_err(|e| {
                    AppError::Internal(format!("failed to deserialize '{}': {}", key, e))
                })
            })
    }

    /// Gets a value from the row, returning `None` if the key doesn't exist or is null.
    ///
    /// Still returns an error if the key exists but deserialization fails.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.data.get(key) {
            Some(v) if v.is_null() => Ok(None),
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| AppError::Internal(format!("failed to deserialize '{}': {}", key, e))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_get_string() {
        let mut data = HashMap::new();
        data.insert("name".to_string(), json!("GraphRAG"));
        let row = Row::new(data);

        let name: String = row.get("name").unwrap();
        assert_eq!(name, "GraphRAG");
    }

    #[test]
    fn test_row_get_list() {
        let mut data = HashMap::new();
        data.insert("labels".to_string(), json!(["Topic"]));
        let row = Row::new(data);

        let labels: Vec<String> = row.get("labels").unwrap();
        assert_eq!(labels, vec!["Topic"]);
    }

    #[test]
    fn test_row_get_missing_key() {
        let row = Row::new(HashMap::new());
        let result: Result<String, _> = row.get("missing");
        assert!(result.is_err());
    }

    #[test]
    fn test_row_get_opt_null() {
        let mut data = HashMap::new();
        data.insert("propertyName".to_string(), JsonValue::Null);
        let row = Row::new(data);

        let name: Option<String> = row.get_opt("propertyName").unwrap();
        assert_eq!(name, None);
    }

    #[test]
    fn test_row_serializes_as_object() {
        let mut data = HashMap::new();
        data.insert("name".to_string(), json!("Neo4j"));
        let row = Row::new(data);

        assert_eq!(serde_json::to_value(&row).unwrap(), json!({"name": "Neo4j"}));
    }
}
