//! Template store contract and a RON-backed in-memory implementation.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use std::path::Path;
use thiserror::Error;

use crate::core::query::BoxError;
use crate::core::random::{rng_from_seed, shuffle};
use crate::schema::template::Template;

/// Source of question templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Return `n` templates chosen at random.
    async fn sample_templates(&self, n: usize) -> Result<Vec<Template>, BoxError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Templates held in memory, sampled without replacement.
///
/// Asking for more templates than the store holds returns all of them in
/// random order.
pub struct InMemoryTemplateStore {
    templates: Vec<Template>,
    rng: Mutex<StdRng>,
}

impl InMemoryTemplateStore {
    pub fn new(templates: Vec<Template>) -> Self {
        Self {
            templates,
            rng: Mutex::new(rng_from_seed(None)),
        }
    }

    pub fn with_seed(templates: Vec<Template>, seed: u64) -> Self {
        Self {
            templates,
            rng: Mutex::new(rng_from_seed(Some(seed))),
        }
    }

    /// Load templates from a RON file containing a list of `Template`.
    pub fn load_from_ron(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Self, StoreError> {
        let templates: Vec<Template> = ron::from_str(input)?;
        Ok(Self::new(templates))
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn sample_templates(&self, n: usize) -> Result<Vec<Template>, BoxError> {
        let mut indices: Vec<usize> = (0..self.templates.len()).collect();
        shuffle(&mut indices, &mut *self.rng.lock());
        indices.truncate(n);
        Ok(indices.into_iter().map(|i| self.templates[i].clone()).collect())
    }
}
