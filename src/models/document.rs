//! Retrieved passages.

use serde::{Deserialize, Serialize};

/// A passage returned by the vector leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary key of the stored record.
    pub id: i64,
    /// Passage text.
    pub text: String,
    /// Raw score reported by the store (a distance for L2, a similarity for IP/COSINE).
    pub score: f32,
}

impl Document {
    pub fn new(id: i64, text: impl Into<String>, score: f32) -> Self {
        Self {
            id,
            text: text.into(),
            score,
        }
    }
}
