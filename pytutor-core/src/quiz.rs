//! Quiz parser: turns sanitized generator output into a [`Quiz`].
//!
//! Expected layout, repeated ten times:
//!
//! ```text
//! 1. What is 2+2?
//! A) 3
//! B) 4
//! C) 5
//! D) 6
//! Correct: B
//! ```
//!
//! Parsing is strict on purpose. Text that does not follow the layout is
//! rejected outright so the caller can ask the generator again instead of
//! showing a half-parsed quiz.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ParseError;
use crate::types::{OPTIONS_PER_QUESTION, OptionLabel, Quiz, QuizOption, QuizQuestion};

/// A numeral followed by a period, wherever it occurs.
static QUESTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.").expect("question-number pattern is valid"));

/// `Correct: B`, optionally followed by punctuation and more text (`Correct: B) 4`).
static ANSWER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^correct(?:\s+answer)?\s*:\s*([a-d])(?:[^a-z0-9].*)?$")
        .expect("answer-line pattern is valid")
});

/// Separator between an option's label and its text.
const OPTION_SEPARATOR: &str = ") ";

/// Parse generated quiz text into exactly ten questions.
///
/// Questions are split at every numeral followed by a period, so the
/// numbering need not start a line. A period directly followed by another
/// digit (`2.5`) is a decimal, not a question number. Anything before the
/// first numbered question is ignored, as are lines that follow a
/// question's `Correct:` line.
///
/// # Errors
/// Returns the first block-level [`ParseError`] encountered, or
/// [`ParseError::WrongQuestionCount`] if every block parsed but the count is
/// not ten.
pub fn parse_quiz(text: &str) -> Result<Quiz, ParseError> {
    let questions = question_blocks(text)
        .into_iter()
        .enumerate()
        .map(|(i, block)| parse_block(i + 1, block))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = questions.len(), "parsed quiz blocks");
    Quiz::new(questions)
}

/// The text between consecutive question numbers, and after the last one.
fn question_blocks(text: &str) -> Vec<&str> {
    let numbers: Vec<(usize, usize)> = QUESTION_NUMBER
        .find_iter(text)
        .filter(|m| !text[m.end()..].starts_with(|c: char| c.is_ascii_digit()))
        .map(|m| (m.start(), m.end()))
        .collect();

    numbers
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start))| {
            let body_end = numbers.get(i + 1).map_or(text.len(), |&(next, _)| next);
            &text[body_start..body_end]
        })
        .collect()
}

fn parse_block(question: usize, block: &str) -> Result<QuizQuestion, ParseError> {
    let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());

    let question_text = lines.next().ok_or(ParseError::EmptyQuestion { question })?;
    let rest: Vec<&str> = lines.collect();
    if rest.len() <= OPTIONS_PER_QUESTION {
        return Err(ParseError::MissingAnswerLine { question });
    }

    let mut options: Vec<QuizOption> = Vec::with_capacity(OPTIONS_PER_QUESTION);
    for line in &rest[..OPTIONS_PER_QUESTION] {
        let option = parse_option(question, line)?;
        if options.iter().any(|o| o.label == option.label) {
            return Err(malformed(question, line));
        }
        options.push(option);
    }

    let correct_label = parse_answer_line(rest[OPTIONS_PER_QUESTION])
        .ok_or(ParseError::MissingAnswerLine { question })?;

    let options: [QuizOption; OPTIONS_PER_QUESTION] = options
        .try_into()
        .map_err(|_| malformed(question, rest[0]))?;

    QuizQuestion::new(question_text, options, correct_label)
        .ok_or(ParseError::MissingAnswerLine { question })
}

fn parse_option(question: usize, line: &str) -> Result<QuizOption, ParseError> {
    let (label, text) = line
        .split_once(OPTION_SEPARATOR)
        .ok_or_else(|| malformed(question, line))?;
    let label: OptionLabel = label.parse().map_err(|_| malformed(question, line))?;
    Ok(QuizOption::new(label, text.trim()))
}

fn parse_answer_line(line: &str) -> Option<OptionLabel> {
    let caps = ANSWER_LINE.captures(line)?;
    caps.get(1)?.as_str().chars().next().and_then(OptionLabel::from_char)
}

fn malformed(question: usize, line: &str) -> ParseError {
    ParseError::MalformedOption {
        question,
        line: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QUIZ_LENGTH;

    fn block(n: usize) -> String {
        format!("{n}. What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nCorrect: B\n")
    }

    fn quiz_text(count: usize) -> String {
        (1..=count).map(block).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn parses_ten_well_formed_blocks() {
        let quiz = parse_quiz(&quiz_text(10)).expect("well-formed quiz");
        assert_eq!(quiz.len(), QUIZ_LENGTH);

        let first = &quiz.questions()[0];
        assert_eq!(first.question_text(), "What is 2+2?");
        assert_eq!(first.correct_label(), OptionLabel::B);
        assert_eq!(first.option(OptionLabel::B).map(|o| o.text.as_str()), Some("4"));
        for q in quiz.questions() {
            assert_eq!(q.options().len(), 4);
            assert!(q.option(q.correct_label()).is_some());
        }
    }

    #[test]
    fn rejects_nine_and_eleven_blocks() {
        for count in [9, 11] {
            let err = parse_quiz(&quiz_text(count)).expect_err("count must be ten");
            assert_eq!(err.reason(), "wrong question count");
            assert_eq!(
                err,
                ParseError::WrongQuestionCount {
                    expected: 10,
                    found: count
                }
            );
        }
    }

    #[test]
    fn rejects_text_without_numbered_questions() {
        let err = parse_quiz("Sorry, I cannot help with that.").expect_err("no blocks");
        assert_eq!(err, ParseError::WrongQuestionCount { expected: 10, found: 0 });
    }

    #[test]
    fn rejects_option_without_separator() {
        let text = quiz_text(10).replacen("C) 5", "C 5", 1);
        let err = parse_quiz(&text).expect_err("malformed option");
        assert_eq!(err.reason(), "malformed option");
        assert_eq!(
            err,
            ParseError::MalformedOption {
                question: 1,
                line: "C 5".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_and_repeated_labels() {
        let text = quiz_text(10).replacen("D) 6", "E) 6", 1);
        assert_eq!(parse_quiz(&text).expect_err("E").reason(), "malformed option");

        let text = quiz_text(10).replacen("D) 6", "C) 6", 1);
        assert_eq!(parse_quiz(&text).expect_err("dup").reason(), "malformed option");
    }

    #[test]
    fn rejects_missing_answer_line() {
        let text = quiz_text(10).replacen("Correct: B\n", "", 1);
        let err = parse_quiz(&text).expect_err("no answer line");
        assert_eq!(err.reason(), "missing correct-answer line");
        assert_eq!(err, ParseError::MissingAnswerLine { question: 1 });
    }

    #[test]
    fn rejects_answer_line_that_is_not_an_answer() {
        let text = quiz_text(10).replacen("Correct: B", "Answer unknown", 1);
        assert_eq!(
            parse_quiz(&text).expect_err("bad answer").reason(),
            "missing correct-answer line"
        );

        let text = quiz_text(10).replacen("Correct: B", "Correct: Because", 1);
        assert_eq!(
            parse_quiz(&text).expect_err("bad letter").reason(),
            "missing correct-answer line"
        );
    }

    #[test]
    fn rejects_empty_block() {
        let text = format!("1.\n{}", quiz_text(10).replace("1. ", "2. "));
        assert_eq!(parse_quiz(&text).expect_err("empty").reason(), "empty question");
    }

    #[test]
    fn block_errors_win_over_count() {
        let text = quiz_text(3).replacen("A) 3", "A-3", 1);
        assert_eq!(parse_quiz(&text).expect_err("malformed").reason(), "malformed option");
    }

    #[test]
    fn tolerates_preamble_blank_lines_and_explanations() {
        let mut text = String::from("Here is your quiz:\n\n");
        for n in 1..=10 {
            text.push_str(&format!(
                "{n}. Which keyword defines a function?\n\nA) func\nB) def\n\nC) lambda\nD) fn\ncorrect: b) def\nExplanation: def starts a function.\n\n"
            ));
        }
        let quiz = parse_quiz(&text).expect("lenient whitespace");
        assert_eq!(quiz.len(), 10);
        assert_eq!(quiz.questions()[9].correct_label(), OptionLabel::B);
        assert_eq!(quiz.questions()[9].correct_option().text, "def");
    }

    #[test]
    fn decimals_inside_lines_do_not_split_blocks() {
        let text = quiz_text(10).replace("What is 2+2?", "What is round(2.5)?").replace("A) 3", "A) 3.0");
        let quiz = parse_quiz(&text).expect("decimals are not question numbers");
        assert_eq!(quiz.questions()[0].question_text(), "What is round(2.5)?");
        assert_eq!(quiz.questions()[0].options()[0].text, "3.0");
    }

    #[test]
    fn numbering_need_not_start_a_line() {
        let single = |n: usize| format!("{n}. What is 2+2?\nA) 3\nB) 4\nC) 5\nD) 6\nCorrect: B");

        let joined = (1..=10).map(single).collect::<Vec<_>>().join(" ");
        let quiz = parse_quiz(&joined).expect("blocks joined by spaces");
        assert_eq!(quiz.len(), QUIZ_LENGTH);
        assert_eq!(quiz.questions()[9].correct_label(), OptionLabel::B);

        let glued: String = (1..=10).map(single).collect();
        let quiz = parse_quiz(&glued).expect("blocks glued together");
        assert_eq!(quiz.len(), QUIZ_LENGTH);
        let first = &quiz.questions()[0];
        assert_eq!(first.correct_label(), OptionLabel::B);
        assert_eq!(first.option(OptionLabel::B).map(|o| o.text.as_str()), Some("4"));
    }

    #[test]
    fn version_numbers_followed_by_digits_stay_in_the_question() {
        let text = quiz_text(10).replace("What is 2+2?", "Which release is 3.12 newer than?");
        let quiz = parse_quiz(&text).expect("3.12 is not a question number");
        assert_eq!(quiz.questions()[4].question_text(), "Which release is 3.12 newer than?");
    }

    #[test]
    fn option_text_keeps_later_separators() {
        let text = quiz_text(10).replacen("A) 3", "A) f(x) (y)", 1);
        let quiz = parse_quiz(&text).expect("split on first separator only");
        assert_eq!(quiz.questions()[0].options()[0].text, "f(x) (y)");
    }
}
