//! Terminal prompts.
//!
//! The interactive command talks to a [`Prompter`] so the flow can run
//! against scripted answers as well as a real terminal.

use inquire::{InquireError, Text};

use crate::error::{PromptError, PromptResult};

/// Source of answers for interactive questions.
pub trait Prompter {
    /// Ask one question. `default` is shown as a hint; an empty answer is
    /// returned as-is.
    fn ask(&mut self, message: &str, default: Option<&str>) -> PromptResult<String>;
}

/// Prompts on the terminal using [inquire](https://crates.io/crates/inquire).
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask(&mut self, message: &str, default: Option<&str>) -> PromptResult<String> {
        let mut prompt = Text::new(message);
        if let Some(default) = default {
            prompt = prompt.with_placeholder(default);
        }
        prompt.prompt().map_err(map_inquire_error)
    }
}

/// Convert inquire errors to PromptError.
fn map_inquire_error(e: InquireError) -> PromptError {
    match e {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            PromptError::Cancelled
        }
        other => PromptError::Failed(other.to_string()),
    }
}

/// Ask and trim the answer, using `default` when it is blank.
pub fn ask_or_default<P: Prompter + ?Sized>(
    prompter: &mut P,
    message: &str,
    default: &str,
) -> PromptResult<String> {
    let answer = prompter.ask(message, Some(default))?;
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

/// Ask and trim the answer.
pub fn ask_trimmed<P: Prompter + ?Sized>(prompter: &mut P, message: &str) -> PromptResult<String> {
    Ok(prompter.ask(message, None)?.trim().to_string())
}

/// Answers taken from a list, for tests.
#[cfg(test)]
pub(crate) struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, message: &str, _default: Option<&str>) -> PromptResult<String> {
        self.asked.push(message.to_string());
        self.answers.pop_front().ok_or(PromptError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answer_uses_default() {
        let mut prompter = ScriptedPrompter::new(&["   ", " ; "]);

        assert_eq!(ask_or_default(&mut prompter, "Delimiter", " ").unwrap(), " ");
        assert_eq!(ask_or_default(&mut prompter, "Delimiter", " ").unwrap(), ";");
    }

    #[test]
    fn test_trimmed() {
        let mut prompter = ScriptedPrompter::new(&["  people.csv\n"]);
        assert_eq!(ask_trimmed(&mut prompter, "File").unwrap(), "people.csv");
        assert_eq!(prompter.asked, vec!["File".to_string()]);
    }

    #[test]
    fn test_exhausted_answers_cancel() {
        let mut prompter = ScriptedPrompter::new(&[]);
        assert!(matches!(
            ask_trimmed(&mut prompter, "File"),
            Err(PromptError::Cancelled)
        ));
    }
}
