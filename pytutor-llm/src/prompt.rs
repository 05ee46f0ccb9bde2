//! Prompt templates for pytutor generation calls.
//!
//! Every prompt is a fixed, testable template. Caller-supplied text is
//! embedded verbatim; nothing is validated or escaped, so an empty level or
//! question is passed through as-is.

use pytutor_core::Persona;

/// Quiz generation prompt.
pub const QUIZ_TEMPLATE: &str = r"Generate a quiz with 10 multiple-choice high difficulty questions for a {level} student studying Python.
For each question, provide 4 options (A, B, C, D) with one correct answer.
Format:

1. [Question]
A) [Option A]
B) [Option B]
C) [Option C]
D) [Option D]
Correct: [Correct option letter]

Repeat this format for all 10 questions, numbered 1 to 10.
Do not use asterisks or * anywhere. Do not use markdown formatting or code fences.";

/// Tutor prompt, standard persona.
pub const TUTOR_STANDARD_TEMPLATE: &str = r#"You are a Python Tutor. Your student is at {level} level and asks: "{question}"
Talk like a human if the input is not a question or a lesson.
If it is a question, explain the concept in a simple and clear way, suitable for the student's level. Break it down into easy-to-understand steps and provide multiple examples wherever applicable.
Include the following:
1. A basic explanation of the concept.
2. Real-life analogies to help the student understand better.
3. One or more examples of how the concept is used in Python code, with an explanation of each step in the example.
4. Any common mistakes beginners might make, and how to avoid them.
5. If applicable, suggest resources or next steps the student can take to learn more about this topic.
Never use * or asterisks, and do not use any markdown formatting in your response.
You can use new lines but no * or ** at all, no formatting allowed.
Your goal is to make the concept as approachable and understandable as possible for a new Python learner. Be friendly and patient in your response!"#;

/// Tutor prompt, casual persona.
pub const TUTOR_CASUAL_TEMPLATE: &str = r#"You are a laid-back Python buddy helping a friend at {level} level. They just said: "{question}"
If that is small talk, chat back naturally, like a friend would.
If it is a question, explain it the way you would over coffee: short sentences, everyday analogies, and a small Python example or two with a quick walk-through of what each line does.
Point out the mistake people usually make with this, and suggest one thing to try next.
Never use * or asterisks, and do not use any markdown formatting in your response.
You can use new lines but no * or ** at all, no formatting allowed.
Keep it light, encouraging and easy to follow."#;

/// Single-pass template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value. Unknown placeholders are
/// left untouched, and substituted values are never re-scanned, so user text
/// containing `{level}` stays literal.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match replacement {
            Some((value, close)) => {
                result.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Build the quiz generation prompt for a class level.
#[must_use]
pub fn build_quiz_prompt(level: &str) -> String {
    render_template(QUIZ_TEMPLATE, &[("level", level)])
}

/// Build the tutor prompt for a learner question.
#[must_use]
pub fn build_tutor_prompt(level: &str, persona: Persona, question: &str) -> String {
    render_template(tutor_template(persona), &[("level", level), ("question", question)])
}

/// The raw template used for a persona.
#[must_use]
pub fn tutor_template(persona: Persona) -> &'static str {
    match persona {
        Persona::Standard => TUTOR_STANDARD_TEMPLATE,
        Persona::Casual => TUTOR_CASUAL_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_rendering_works() {
        let rendered = render_template(
            "Hello {name}, you are a {role}.",
            &[("name", "Ada"), ("role", "student")],
        );
        assert_eq!(rendered, "Hello Ada, you are a student.");
    }

    #[test]
    fn template_handles_missing_vars() {
        let rendered = render_template("Hello {name}, {unknown}.", &[("name", "Ada")]);
        assert_eq!(rendered, "Hello Ada, {unknown}.");
    }

    #[test]
    fn template_handles_unbalanced_braces() {
        assert_eq!(render_template("a { b", &[("b", "x")]), "a { b");
        assert_eq!(render_template("{{level}}", &[("level", "x")]), "{x}");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let prompt = build_tutor_prompt("beginner", Persona::Standard, "what is {level}?");
        assert!(prompt.contains(r#""what is {level}?""#));
    }

    #[test]
    fn quiz_prompt_embeds_level_and_format() {
        let prompt = build_quiz_prompt("11th grade");
        assert!(prompt.contains("for a 11th grade student"));
        assert!(prompt.contains("10 multiple-choice"));
        assert!(prompt.contains("Correct: [Correct option letter]"));
        assert!(prompt.contains("asterisks"));
        assert!(!prompt.contains("{level}"));
    }

    #[test]
    fn empty_inputs_pass_through() {
        assert!(build_quiz_prompt("").contains("for a  student"));
        let prompt = build_tutor_prompt("", Persona::Casual, "");
        assert!(prompt.contains(r#"They just said: """#));
    }

    #[test]
    fn personas_use_different_templates() {
        let standard = build_tutor_prompt("beginner", Persona::Standard, "What is a list?");
        let casual = build_tutor_prompt("beginner", Persona::Casual, "What is a list?");
        assert_ne!(standard, casual);
        for prompt in [&standard, &casual] {
            assert!(prompt.contains("What is a list?"));
            assert!(prompt.contains("beginner"));
            assert!(prompt.contains("no * or **"));
        }
    }

    #[test]
    fn prompts_are_deterministic() {
        assert_eq!(build_quiz_prompt("college"), build_quiz_prompt("college"));
        assert_eq!(
            build_tutor_prompt("college", Persona::Casual, "hi"),
            build_tutor_prompt("college", Persona::Casual, "hi")
        );
    }
}
