//! Query-time services.
//!
//! [`RetrievalService`] runs the vector and graph legs; [`SynthesisService`]
//! merges their outputs and asks the chat model for the final answer.

mod retrieval;
mod synthesis;

pub use retrieval::RetrievalService;
pub use synthesis::{build_context, SynthesisService};
