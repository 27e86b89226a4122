//! LLM chains.

mod cypher_qa;
pub mod prompts;

pub use cypher_qa::CypherQaChain;
