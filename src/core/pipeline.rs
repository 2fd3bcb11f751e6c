/// The question pipeline: Template → Query → Facts → Question orchestration.
///
/// Wires together template sampling, timed query dispatch, answer assembly
/// and the batch-wide number formatting pass.

use futures::future::try_join_all;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::core::assembly::{assemble_question, pick_entity, AssemblyError, AssemblyOptions};
use crate::core::config::{ConfigError, Dispatch, GeneratorConfig};
use crate::core::query::{BoxError, KnowledgeGraph, QueryError, TimedQueryExecutor};
use crate::core::random::rng_from_seed;
use crate::core::store::TemplateStore;
use crate::core::validate::validate_answer_numbers;
use crate::schema::question::Question;
use crate::schema::template::Template;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Store(BoxError),
    #[error("timeout exceeded for query: {query}")]
    QueryTimeout { query: String, timeout_ms: u64 },
    #[error(transparent)]
    Upstream(BoxError),
    #[error("insufficient data for template '{template}': {available} usable facts, need {required}")]
    InsufficientData {
        template: String,
        available: usize,
        required: usize,
    },
    #[error("question count must be positive, got {0}")]
    InvalidCount(usize),
    #[error("template store returned {received} templates, {requested} requested")]
    TemplateShortfall { requested: usize, received: usize },
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}

impl From<QueryError> for GenerationError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Timeout { query, timeout_ms } => {
                GenerationError::QueryTimeout { query, timeout_ms }
            }
            QueryError::Upstream(source) => GenerationError::Upstream(source),
        }
    }
}

impl From<AssemblyError> for GenerationError {
    fn from(err: AssemblyError) -> Self {
        match err {
            AssemblyError::InsufficientData {
                template,
                available,
                required,
            } => GenerationError::InsufficientData {
                template,
                available,
                required,
            },
            // No row can supply the correct answer.
            AssemblyError::NoSubject(template) => GenerationError::InsufficientData {
                template,
                available: 0,
                required: 1,
            },
            AssemblyError::NoEntities(name) => {
                GenerationError::InvalidTemplate(format!("template '{}' lists no entity ids", name))
            }
        }
    }
}

/// The top-level question generator. Built via `QuestionGenerator::builder()`.
pub struct QuestionGenerator {
    store: Arc<dyn TemplateStore>,
    executor: TimedQueryExecutor,
    config: GeneratorConfig,
    rng: Box<dyn RngCore + Send + Sync>,
}

/// Builder for constructing a `QuestionGenerator`.
pub struct QuestionGeneratorBuilder {
    store: Option<Arc<dyn TemplateStore>>,
    graph: Option<Arc<dyn KnowledgeGraph>>,
    config: Option<GeneratorConfig>,
    config_path: Option<String>,
    seed: Option<u64>,
    query_timeout: Option<Duration>,
    /// Directly provided random source (for tests that pin randomness).
    rng: Option<Box<dyn RngCore + Send + Sync>>,
}

impl QuestionGenerator {
    pub fn builder() -> QuestionGeneratorBuilder {
        QuestionGeneratorBuilder {
            store: None,
            graph: None,
            config: None,
            config_path: None,
            seed: None,
            query_timeout: None,
            rng: None,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate exactly `count` questions.
    ///
    /// Any store failure, query timeout, upstream error or template without
    /// enough distinct facts aborts the whole batch; no partial batch is
    /// returned and nothing is retried.
    pub async fn generate_questions(
        &mut self,
        count: usize,
    ) -> Result<Vec<Question>, GenerationError> {
        if count == 0 {
            return Err(GenerationError::InvalidCount(count));
        }
        let start = Instant::now();

        // 1. Fetch templates
        let mut templates = self
            .store
            .sample_templates(count)
            .await
            .map_err(GenerationError::Store)?;
        if templates.len() < count {
            return Err(GenerationError::TemplateShortfall {
                requested: count,
                received: templates.len(),
            });
        }
        templates.truncate(count);

        // 2. One template-local random source each, so dispatch order
        // never changes the outcome
        let seeds: Vec<u64> = templates.iter().map(|_| self.rng.next_u64()).collect();

        let this = &*self;
        let jobs = templates
            .iter()
            .zip(seeds)
            .enumerate()
            .map(|(i, (template, seed))| {
                this.build_question(i as u32 + 1, template, StdRng::seed_from_u64(seed))
            });

        let mut questions = match this.config.dispatch {
            Dispatch::Sequential => {
                let mut out = Vec::with_capacity(count);
                for job in jobs {
                    out.push(job.await?);
                }
                out
            }
            Dispatch::Concurrent => try_join_all(jobs).await?,
        };

        // 3. Validate/format
        validate_answer_numbers(&mut questions, &this.config.number_format);

        tracing::info!(
            count = questions.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Question batch generated"
        );
        Ok(questions)
    }

    async fn build_question(
        &self,
        id: u32,
        template: &Template,
        mut rng: StdRng,
    ) -> Result<Question, GenerationError> {
        let entity = pick_entity(template, &mut rng)?;
        let query = template.build_query(&self.config.placeholder, entity);

        tracing::debug!(
            template = template.name(),
            entity = entity,
            "Dispatching knowledge-graph query"
        );
        let facts = self.executor.execute(&query).await?;

        let options = AssemblyOptions {
            placeholder: &self.config.placeholder,
            correct_answer: self.config.correct_answer,
            number_format: &self.config.number_format,
        };
        let question = assemble_question(id, template, facts, &options, &mut rng)?;

        tracing::debug!(
            id,
            template = template.name(),
            correct_answer_id = question.correct_answer_id,
            "Assembled question"
        );
        Ok(question)
    }
}

impl QuestionGeneratorBuilder {
    pub fn template_store(mut self, store: Arc<dyn TemplateStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn knowledge_graph(mut self, graph: Arc<dyn KnowledgeGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load configuration from a RON file at build time. An explicit
    /// `config()` takes precedence.
    pub fn config_path(mut self, path: &str) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Provide the random source directly. Overrides any seed.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send + Sync>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<QuestionGenerator, GenerationError> {
        let mut config = match (self.config, self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => GeneratorConfig::load_from_ron(Path::new(&path))?,
            (None, None) => GeneratorConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(timeout) = self.query_timeout {
            config.query_timeout_ms = timeout.as_millis() as u64;
        }
        config.validate()?;

        let store = self
            .store
            .ok_or(GenerationError::MissingCollaborator("template store"))?;
        let graph = self
            .graph
            .ok_or(GenerationError::MissingCollaborator("knowledge graph"))?;
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(rng_from_seed(config.seed)));

        Ok(QuestionGenerator {
            store,
            executor: TimedQueryExecutor::new(graph, config.query_timeout()),
            config,
            rng,
        })
    }
}
