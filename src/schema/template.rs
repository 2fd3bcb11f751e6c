use serde::{Deserialize, Serialize};

/// A stored question pattern: a sentence with a placeholder marker and the
/// knowledge-graph query that supplies its facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Question sentence, e.g. `"What is the capital of $$$?"`.
    pub question_text: String,
    pub query_type: QueryType,
}

/// The parametrized query half of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryType {
    pub name: String,
    /// Query text containing the same placeholder as the question.
    pub query_template: String,
    /// Candidate entity ids substituted into `query_template`.
    #[serde(default)]
    pub entity_ids: Vec<String>,
}

impl Template {
    pub fn name(&self) -> &str {
        &self.query_type.name
    }

    /// Query text with `placeholder` replaced by `entity_id`.
    pub fn build_query(&self, placeholder: &str, entity_id: &str) -> String {
        self.query_type.query_template.replace(placeholder, entity_id)
    }

    /// Question text with `placeholder` replaced by `label`.
    pub fn build_question(&self, placeholder: &str, label: &str) -> String {
        self.question_text.replace(placeholder, label)
    }
}
