//! Batch-wide post-processing of answer texts.

use crate::core::number::{NumberFormat, NumericText};
use crate::schema::question::Question;

/// Reformat every numeric answer text in the batch with `format`.
///
/// Non-numeric answers, answer order and `correct_answer_id` are untouched.
pub fn validate_answer_numbers(questions: &mut [Question], format: &NumberFormat) {
    for question in questions.iter_mut() {
        for answer in question.answers.iter_mut() {
            if NumericText::parse(&answer.text).is_number() {
                answer.text = format.format(&answer.text);
            }
        }
    }
}
