//! Domain models for a single query pass.
//!
//! Nothing here outlives one call to the agent; durable state lives in the
//! vector and graph stores.

mod document;
mod outcome;
mod result;

pub use document::Document;
pub use outcome::LegOutcome;
pub use result::{GraphAnswer, QueryResult};
