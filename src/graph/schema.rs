//! Graph schema introspection for prompt construction.
//!
//! The Cypher QA chain shows the model which labels, relationship types and
//! properties exist so that generated statements only reference real ones.
//! Introspection relies on the built-in `db.schema.*` procedures; APOC is not
//! required.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::AppError;
use crate::graph::query::QueryExt;
use crate::graph::row::Row;
use crate::graph::traits::CypherExecutor;

const NODE_PROPERTIES_QUERY: &str = "CALL db.schema.nodeTypeProperties()
     YIELD nodeLabels, propertyName, propertyTypes
     RETURN nodeLabels, propertyName, propertyTypes";

const REL_PROPERTIES_QUERY: &str = "CALL db.schema.relTypeProperties()
     YIELD relType, propertyName, propertyTypes
     RETURN relType, propertyName, propertyTypes";

const PATTERNS_QUERY: &str = "MATCH (a)-[r]->(b)
     WITH labels(a) AS from_labels, type(r) AS rel_type, labels(b) AS to_labels
     RETURN DISTINCT from_labels, rel_type, to_labels
     LIMIT 100";

/// A `(:From)-[:REL]->(:To)` pattern present in the data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelationshipPattern {
    pub from: String,
    pub rel_type: String,
    pub to: String,
}

/// Labels, relationship types and their properties.
///
/// Properties map a name to its Neo4j type (e.g. `name` → `STRING`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSchema {
    pub node_properties: BTreeMap<String, BTreeMap<String, String>>,
    pub rel_properties: BTreeMap<String, BTreeMap<String, String>>,
    pub patterns: BTreeSet<RelationshipPattern>,
}

impl GraphSchema {
    /// Reads the schema from a live graph.
    pub async fn introspect<E>(executor: &E) -> Result<Self, AppError>
    where
        E: CypherExecutor + ?Sized,
    {
        let mut schema = GraphSchema::default();

        for row in executor.query(NODE_PROPERTIES_QUERY).fetch_all().await? {
            let labels: Vec<String> = row.get("nodeLabels")?;
            let label = labels.join(":");
            let properties = schema.node_properties.entry(label).or_default();
            if let Some((name, ty)) = Self::property(&row)? {
                properties.insert(name, ty);
            }
        }

        for row in executor.query(REL_PROPERTIES_QUERY).fetch_all().await? {
            let rel_type: String = row.get("relType")?;
            let properties = schema
                .rel_properties
                .entry(Self::strip_rel_type(&rel_type))
                .or_default();
            if let Some((name, ty)) = Self::property(&row)? {
                properties.insert(name, ty);
            }
        }

        for row in executor.query(PATTERNS_QUERY).fetch_all().await? {
            let from: Vec<String> = row.get("from_labels")?;
            let to: Vec<String> = row.get("to_labels")?;
            schema.patterns.insert(RelationshipPattern {
                from: from.join(":"),
                rel_type: row.get("rel_type")?,
                to: to.join(":"),
            });
        }

        tracing::debug!(
            labels = schema.node_properties.len(),
            rel_types = schema.rel_properties.len(),
            patterns = schema.patterns.len(),
            "Introspected graph schema"
        );

        Ok(schema)
    }

    /// Extracts `(propertyName, TYPE)` from a `db.schema.*` row.
    ///
    /// Labels without properties come back with a null `propertyName`.
    fn property(row: &Row) -> Result<Option<(String, String)>, AppError> {
        let Some(name) = row.get_opt::<String>("propertyName")? else {
            return Ok(None);
        };
        let types: Vec<String> = row.get_opt("propertyTypes")?.unwrap_or_default();
        let ty = if types.is_empty() {
            "ANY".to_string()
        } else {
            types.join("|").to_ascii_uppercase()
        };
        Ok(Some((name, ty)))
    }

    /// `db.schema.relTypeProperties` reports types as ``:`USES` ``.
    fn strip_rel_type(raw: &str) -> String {
        raw.trim_start_matches(':').trim_matches('`').to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.node_properties.is_empty() && self.rel_properties.is_empty() && self.patterns.is_empty()
    }
}

impl fmt::Display for GraphSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_properties(
            f: &mut fmt::Formatter<'_>,
            entries: &BTreeMap<String, BTreeMap<String, String>>,
        ) -> fmt::Result {
            let mut any = false;
            for (name, properties) in entries.iter().filter(|(_, p)| !p.is_empty()) {
                let rendered: Vec<String> = properties
                    .iter()
                    .map(|(key, ty)| format!("{}: {}", key, ty))
                    .collect();
                writeln!(f, "{} {{{}}}", name, rendered.join(", "))?;
                any = true;
            }
            if !any {
                writeln!(f, "(none)")?;
            }
            Ok(())
        }

        writeln!(f, "Node properties:")?;
        write_properties(f, &self.node_properties)?;
        writeln!(f, "Relationship properties:")?;
        write_properties(f, &self.rel_properties)?;
        writeln!(f, "The relationships:")?;
        if self.patterns.is_empty() {
            writeln!(f, "(none)")?;
        }
        for pattern in &self.patterns {
            writeln!(f, "(:{})-[:{}]->(:{})", pattern.from, pattern.rel_type, pattern.to)?;
        }
        Ok(())
    }
}
