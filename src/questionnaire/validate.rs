//! Step completion checks.

use crate::questionnaire::answer::Answer;
use crate::questionnaire::question::{self, QuestionKind};
use crate::questionnaire::state::AnswerMap;

/// True when the answer required for `step` is present and non-empty.
///
/// Checkbox steps need at least one selection; text-like steps need a
/// non-whitespace string (a numeric answer also satisfies an input step).
/// Out-of-range steps are never complete. Pure; callable anywhere.
pub fn is_step_complete(step: usize, answers: &AnswerMap) -> bool {
    let Some(question) = question::at(step) else {
        return false;
    };
    let Some(answer) = answers.get(question.id) else {
        return false;
    };
    match question.kind {
        QuestionKind::Checkbox => matches!(answer, Answer::Multi(values) if !values.is_empty()),
        QuestionKind::Radio | QuestionKind::Textarea => {
            matches!(answer, Answer::Text(value) if !value.trim().is_empty())
        }
        QuestionKind::Input => match answer {
            Answer::Text(value) => !value.trim().is_empty(),
            Answer::Number(_) => true,
            Answer::Multi(_) => false,
        },
    }
}
