//! Trivia Engine — multiple-choice question generation.
//!
//! Combines stored question templates with facts fetched from a knowledge
//! graph: each template's query runs under a hard deadline, one returned
//! row becomes the correct answer, distinct rows become distractors, and
//! the shuffled answers are formatted for display.

pub mod core;
pub mod schema;

pub use crate::core::config::GeneratorConfig;
pub use crate::core::pipeline::{GenerationError, QuestionGenerator};
pub use crate::schema::question::{Answer, Question};
