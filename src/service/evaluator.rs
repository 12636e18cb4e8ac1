use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::question::{Answer, Question};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        match value {
            true => Verdict::Correct,
            false => Verdict::Incorrect,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct BlankFeedback {
    pub name: String,
    pub expected: Option<String>,
    pub given: Option<String>,
    pub correct: bool,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Placeholder names of the form `{name}` in order of first appearance.
/// Anything else between braces, or an unclosed brace, is plain text.
pub fn extract_blanks(text: &str) -> Vec<String> {
    let mut blanks: Vec<String> = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let name_len: usize = after
            .chars()
            .take_while(|c| is_word_char(*c))
            .map(char::len_utf8)
            .sum();

        if name_len > 0 && after[name_len..].starts_with('}') {
            let name = &after[..name_len];
            if !blanks.iter().any(|b| b == name) {
                blanks.push(name.to_string());
            }
            rest = &after[name_len + 1..];
        } else {
            rest = after;
        }
    }

    blanks
}

/// Local preview of `candidate` against the question's answer key.
/// `None` when the question carries no usable key.
pub fn evaluate(question: &Question, candidate: Option<&Answer>) -> Option<Verdict> {
    let correct = question.correct_answer.as_ref()?;
    let Some(candidate) = candidate else {
        return Some(Verdict::Unanswered);
    };

    let verdict = match (correct, candidate) {
        (Answer::MultipleChoice { selected: j }, Answer::MultipleChoice { selected: i }) => {
            Verdict::from(i == j)
        }
        (Answer::TrueFalse { answer: b2 }, Answer::TrueFalse { answer: b1 }) => {
            Verdict::from(b1 == b2)
        }
        (Answer::FillBlank { fills: correct }, Answer::FillBlank { fills }) => {
            let keys = fill_keys(question, correct);
            let all_keys_match = fill_feedback(&keys, correct, fills)
                .iter()
                .all(|f| f.correct);
            let no_extra_keys = fills.keys().all(|k| keys.contains(k));
            Verdict::from(all_keys_match && no_extra_keys)
        }
        (Answer::DragDrop { order: correct }, Answer::DragDrop { order }) => {
            Verdict::from(order == correct)
        }
        _ => Verdict::Incorrect,
    };

    Some(verdict)
}

/// Keys judged for a fill-in question: its placeholders, then any key the
/// answer key names that the text does not.
pub fn fill_keys(question: &Question, correct: &BTreeMap<String, String>) -> Vec<String> {
    let mut keys = extract_blanks(&question.question_text);
    for key in correct.keys() {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    keys
}

pub fn fill_feedback(
    keys: &[String],
    correct: &BTreeMap<String, String>,
    fills: &BTreeMap<String, String>,
) -> Vec<BlankFeedback> {
    keys.iter()
        .map(|key| {
            let expected = correct.get(key).cloned();
            let given = fills.get(key).cloned();
            BlankFeedback {
                name: key.clone(),
                correct: expected == given,
                expected,
                given,
            }
        })
        .collect()
}

/// Per-position highlight for a drag order: `true` where the item sits
/// where the answer key puts it.
pub fn drag_feedback(correct: &[usize], order: &[usize]) -> Vec<bool> {
    order
        .iter()
        .enumerate()
        .map(|(pos, item)| correct.get(pos) == Some(item))
        .collect()
}

/// Checks that `answer` has the shape the question's type demands.
pub fn validate_shape(question: &Question, answer: &Answer) -> Result<(), String> {
    if answer.question_type() != question.question_type {
        return Err(format!(
            "expected a {} answer, got {}",
            question.question_type.as_str(),
            answer.question_type().as_str()
        ));
    }

    let option_count = question.options().len();
    match answer {
        Answer::MultipleChoice { selected } if *selected >= option_count => Err(format!(
            "option {} does not exist, question has {} options",
            selected, option_count
        )),
        Answer::DragDrop { order } => {
            let mut seen = vec![false; option_count];
            for item in order {
                match seen.get_mut(*item) {
                    Some(slot) if !*slot => *slot = true,
                    _ => return Err(format!("order {:?} is not a permutation of the options", order)),
                }
            }
            if order.len() != option_count {
                return Err(format!("order must place all {} options", option_count));
            }
            Ok(())
        }
        Answer::FillBlank { fills } => {
            let blanks = extract_blanks(&question.question_text);
            match fills.keys().find(|k| !blanks.contains(*k)) {
                Some(unknown) if !blanks.is_empty() => {
                    Err(format!("question has no blank named '{}'", unknown))
                }
                _ => Ok(()),
            }
        }
        _ => Ok(()),
    }
}
