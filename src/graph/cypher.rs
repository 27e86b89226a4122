//! Cypher statement inspection.
//!
//! Generated Cypher comes from a language model, so before it is executed it
//! is tokenized and checked for clauses that modify the graph. Keywords inside
//! string literals, comments and backtick-escaped names are ignored, as are
//! property keys and labels that happen to spell a keyword (`n.set`, `:Create`).
//! Procedure calls count as writes unless the procedure is a known read.
//!
//! # Example
//!
//! ```
//! use graphrag::graph::write_clauses;
//!
//! let clauses = write_clauses("MATCH (n:Topic) DETACH DELETE n").unwrap();
//! assert_eq!(clauses, vec!["DETACH", "DELETE"]);
//!
//! let clauses = write_clauses("MATCH (n) WHERE n.name = 'CREATE' RETURN n").unwrap();
//! assert!(clauses.is_empty());
//! ```

use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "graph/cypher.pest"]
struct CypherLexer;

/// Keywords that start a clause which writes to the graph or its schema.
const WRITE_KEYWORDS: &[&str] = &[
    "CREATE", "MERGE", "DELETE", "DETACH", "SET", "REMOVE", "DROP", "FOREACH",
];

/// Procedures known not to modify the graph.
const READ_PROCEDURES: &[&str] = &[
    "db.labels",
    "db.relationshipTypes",
    "db.propertyKeys",
    "db.indexes",
    "db.constraints",
    "db.info",
    "db.ping",
    "dbms.components",
];

/// Procedure namespaces that only read.
const READ_PROCEDURE_PREFIXES: &[&str] = &["db.schema."];

/// Errors that can occur when tokenizing a Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid Cypher syntax: {0}")]
    InvalidSyntax(String),
}

/// Returns the clauses of a Cypher statement that may write, in order of appearance.
///
/// Write keywords are reported uppercased. A `CALL` of a procedure outside
/// the read-only allowlist is reported as `CALL <name>`; `CALL { ... }`
/// subqueries are inspected like the rest of the statement.
pub fn write_clauses(query: &str) -> Result<Vec<String>, ParseError> {
    let statement = CypherLexer::parse(Rule::Statement, query)
        .map_err(|e| ParseError::InvalidSyntax(e.to_string()))?
        .next()
        .ok_or_else(|| ParseError::InvalidSyntax("empty statement".to_string()))?;

    let tokens: Vec<(Rule, &str)> = statement
        .into_inner()
        .map(|token| (token.as_rule(), token.as_str()))
        .collect();

    let mut clauses = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let (rule, text) = tokens[i];
        i += 1;
        if rule != Rule::Word {
            continue;
        }

        // Property access and labels are names, not keywords
        let previous = i.checked_sub(2).map(|p| tokens[p].1);
        if matches!(previous, Some(".") | Some(":")) {
            continue;
        }

        let upper = text.to_ascii_uppercase();
        if WRITE_KEYWORDS.contains(&upper.as_str()) {
            clauses.push(upper);
        } else if upper == "CALL" {
            let (procedure, next) = procedure_name(&tokens, i);
            if let Some(name) = procedure {
                if !is_read_procedure(&name) {
                    clauses.push(format!("CALL {}", name));
                }
            }
            i = next;
        }
    }

    Ok(clauses)
}

/// Reads a dotted procedure name starting at `start`.
///
/// Returns `None` when no name follows (a `CALL { ... }` subquery), along
/// with the index of the first token after the name.
fn procedure_name(tokens: &[(Rule, &str)], start: usize) -> (Option<String>, usize) {
    let is_part = |i: usize| {
        matches!(tokens.get(i), Some((Rule::Word, _)) | Some((Rule::EscapedName, _)))
    };
    if !is_part(start) {
        return (None, start);
    }

    let mut name = tokens[start].1.to_string();
    let mut i = start + 1;
    while matches!(tokens.get(i), Some((_, "."))) && is_part(i + 1) {
        name.push('.');
        name.push_str(tokens[i + 1].1);
        i += 2;
    }
    (Some(name), i)
}

fn is_read_procedure(name: &str) -> bool {
    READ_PROCEDURES.contains(&name)
        || READ_PROCEDURE_PREFIXES
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

/// Returns true if the statement contains no write clauses.
pub fn is_read_only(query: &str) -> Result<bool, ParseError> {
    Ok(write_clauses(query)?.is_empty())
}

/// Extracts a Cypher statement from a model response.
///
/// The body of the first fenced code block is returned, without its
/// language tag. A response without a complete fence is returned trimmed
/// and otherwise unchanged.
pub fn extract_statement(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        if let Some(end) = after_fence.find("```") {
            let block = &after_fence[..end];
            // Skip the language tag (e.g. "cypher\n")
            let code = match block.find('\n') {
                Some(newline) if !block[..newline].trim().contains(' ') => &block[newline + 1..],
                _ => block,
            };
            return code.trim().to_string();
        }
    }

    trimmed.to_string()
}
