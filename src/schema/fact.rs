use serde::{Deserialize, Serialize};

/// One `(label, fact)` row returned by a knowledge-graph query.
///
/// `subject_label` fills the question placeholder; `fact_label` becomes an
/// answer option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactPair {
    pub subject_label: String,
    pub fact_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl FactPair {
    pub fn new(subject_label: impl Into<String>, fact_label: impl Into<String>) -> Self {
        Self {
            subject_label: subject_label.into(),
            fact_label: fact_label.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
