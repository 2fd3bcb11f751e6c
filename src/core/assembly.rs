//! Turning one template's fact rows into a multiple-choice question.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::number::NumberFormat;
use crate::core::random::{pick_random, shuffle};
use crate::schema::fact::FactPair;
use crate::schema::question::{Answer, Question};
use crate::schema::template::Template;

/// Every question carries exactly this many answers.
pub const ANSWERS_PER_QUESTION: usize = 4;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("insufficient data for template '{template}': {available} usable facts, need {required}")]
    InsufficientData {
        template: String,
        available: usize,
        required: usize,
    },
    #[error("template '{0}' returned no row with a subject label")]
    NoSubject(String),
    #[error("template '{0}' lists no entity ids")]
    NoEntities(String),
}

/// Which fact row supplies the correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorrectAnswer {
    /// Any distinct row with a subject label, chosen at random.
    #[default]
    Random,
    /// The first distinct row with a subject label, for queries that order
    /// their results.
    First,
}

/// Knobs for a single assembly.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyOptions<'a> {
    pub placeholder: &'a str,
    pub correct_answer: CorrectAnswer,
    /// Display format; answers must stay distinct after formatting.
    pub number_format: &'a NumberFormat,
}

/// Choose the entity id a template's query is built for.
pub fn pick_entity<'t, R>(template: &'t Template, rng: &mut R) -> Result<&'t str, AssemblyError>
where
    R: Rng + ?Sized,
{
    pick_random(&template.query_type.entity_ids, rng)
        .map(String::as_str)
        .ok_or_else(|| AssemblyError::NoEntities(template.name().to_string()))
}

/// Drop rows with a blank fact label and rows whose fact label displays the
/// same as one already kept under `format`.
///
/// First occurrence wins, unless it has a blank subject label and a later
/// duplicate does not.
pub fn distinct_facts(facts: Vec<FactPair>, format: &NumberFormat) -> Vec<FactPair> {
    let mut kept_at: FxHashMap<String, usize> = FxHashMap::default();
    let mut kept: Vec<FactPair> = Vec::new();
    for fact in facts {
        if fact.fact_label.trim().is_empty() {
            continue;
        }
        let shown = format.format(&fact.fact_label);
        match kept_at.get(&shown) {
            Some(&i) => {
                if !has_subject(&kept[i]) && has_subject(&fact) {
                    kept[i] = fact;
                }
            }
            None => {
                kept_at.insert(shown, kept.len());
                kept.push(fact);
            }
        }
    }
    kept
}

fn has_subject(fact: &FactPair) -> bool {
    !fact.subject_label.trim().is_empty()
}

/// Build a question from `facts`: one correct row, distinct distractors,
/// shuffled answers, and the index of the correct answer after shuffling.
///
/// Only the correct row needs a subject label; distractors contribute their
/// fact label alone.
pub fn assemble_question<R>(
    id: u32,
    template: &Template,
    facts: Vec<FactPair>,
    options: &AssemblyOptions<'_>,
    rng: &mut R,
) -> Result<Question, AssemblyError>
where
    R: Rng + ?Sized,
{
    let mut pool = distinct_facts(facts, options.number_format);
    if pool.len() < ANSWERS_PER_QUESTION {
        return Err(AssemblyError::InsufficientData {
            template: template.name().to_string(),
            available: pool.len(),
            required: ANSWERS_PER_QUESTION,
        });
    }

    let candidates: Vec<usize> = (0..pool.len()).filter(|&i| has_subject(&pool[i])).collect();
    let picked = match options.correct_answer {
        CorrectAnswer::First => candidates.first(),
        CorrectAnswer::Random => pick_random(&candidates, rng),
    };
    let correct_index = match picked {
        Some(&i) => i,
        None => return Err(AssemblyError::NoSubject(template.name().to_string())),
    };
    let correct = pool.swap_remove(correct_index);

    shuffle(&mut pool, rng);
    pool.truncate(ANSWERS_PER_QUESTION - 1);

    let mut answers: Vec<Answer> = std::iter::once(Answer::new(correct.fact_label.clone()))
        .chain(pool.into_iter().map(|f| Answer::new(f.fact_label)))
        .collect();
    shuffle(&mut answers, rng);

    // Labels are distinct, so the correct label is always present.
    let correct_answer_id = answers
        .iter()
        .position(|a| a.text == correct.fact_label)
        .unwrap_or(0);

    Ok(Question {
        id,
        question: template.build_question(options.placeholder, &correct.subject_label),
        answers,
        correct_answer_id,
        image: correct.image,
    })
}
