//! Prompt templates.
//!
//! Templates use `{name}` placeholders filled by [`render`].

/// Turns a question into a Cypher statement. Placeholders: `schema`, `question`.
pub const CYPHER_GENERATION: &str = "Task: Generate a Cypher statement to query a graph database.
Instructions:
Use only the provided relationship types and properties in the schema.
Do not use any other relationship types or properties that are not provided.
Schema:
{schema}
Note: Do not include any explanations or apologies in your responses.
Do not respond to any questions that might ask anything else than for you to construct a Cypher statement.
Do not include any text except the generated Cypher statement.

The question is:
{question}";

/// Phrases query rows as an answer. Placeholders: `context`, `question`.
pub const CYPHER_QA: &str = "You are an assistant that helps to form nice and human understandable answers.
The information part contains the provided information that you must use to construct an answer.
The provided information is authoritative, you must never doubt it or try to use your internal knowledge to correct it.
Make the answer sound as a response to the question. Do not mention that you based the result on the given information.
If the provided information is empty, say that you don't know the answer.
Information:
{context}

Question: {question}
Helpful Answer:";

/// Final synthesis over both retrieval legs. Placeholders: `context`, `query`.
pub const FINAL_ANSWER: &str = "Generate a comprehensive answer based on the following context and question.

Context:
{context}

Question:
{query}

Answer:";

/// Substitutes each `{key}` in `template` with its value.
///
/// Values are inserted verbatim and never re-scanned, so a value containing
/// `{...}` is left alone.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replaced = after.find('}').and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (value, end))
        });
        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        let prompt = render(FINAL_ANSWER, &[("context", "ctx"), ("query", "What is GraphRAG?")]);
        assert!(prompt.contains("Context:\nctx\n"));
        assert!(prompt.ends_with("Question:\nWhat is GraphRAG?\n\nAnswer:"));
    }

    #[test]
    fn test_render_leaves_unknown_braces() {
        let rendered = render("MATCH (t:Topic {name: 'x'}) {q}", &[("q", "RETURN t")]);
        assert_eq!(rendered, "MATCH (t:Topic {name: 'x'}) RETURN t");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let rendered = render("{a}", &[("a", "{b}"), ("b", "nope")]);
        assert_eq!(rendered, "{b}");
    }

    #[test]
    fn test_templates_have_expected_placeholders() {
        assert!(CYPHER_GENERATION.contains("{schema}") && CYPHER_GENERATION.contains("{question}"));
        assert!(CYPHER_QA.contains("{context}") && CYPHER_QA.contains("{question}"));
        assert!(FINAL_ANSWER.contains("{context}") && FINAL_ANSWER.contains("{query}"));
    }
}
