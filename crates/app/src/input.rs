//! Parsing of one line typed during a quiz.

use thiserror::Error;

use quiz_core::model::{Answer, OptionKeyError};

/// What the learner asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Answer(Answer),
    Next,
    Previous,
    /// 0-based; the learner types the 1-based number.
    Jump(usize),
    Finish,
    Reset,
    Reshuffle,
    Resize(usize),
    AutoAdvance(bool),
    Explain,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("type an answer or a command (h for help)")]
    Empty,
    #[error("unknown command {0:?} (h for help)")]
    UnknownCommand(String),
    #[error("{0} needs a number")]
    MissingNumber(&'static str),
    #[error("{0:?} is not a valid number")]
    InvalidNumber(String),
    #[error("auto expects on or off, got {0:?}")]
    InvalidToggle(String),
    #[error(transparent)]
    InvalidAnswer(#[from] OptionKeyError),
}

pub const HELP: &str = "\
Answer with the option letter (b) or letters for multi-select (a,d).
Commands:
  n, next          next question (finishes on the last one)
  p, prev          previous question
  j N, jump N      go to question N
  finish           finish and show results
  r, reset         start over with the same questions
  shuffle          start over with new questions
  s N, size N      change the number of questions
  auto on|off      move on automatically after answering
  x, explain       ask the AI tutor about this question
  h, help          show this help
  q, quit          leave";

/// Parse one input line.
///
/// Command aliases avoid the letters A to F so they never shadow an option key.
///
/// # Errors
///
/// Returns `InputError` for blank input, unknown words and bad arguments.
pub fn parse(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Empty);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default().to_ascii_lowercase();
    let argument = words.next();

    match command.as_str() {
        "n" | "next" => Ok(Input::Next),
        "p" | "prev" | "previous" => Ok(Input::Previous),
        "j" | "jump" => {
            let number = parse_number(argument, "jump")?;
            Ok(Input::Jump(number - 1))
        }
        "finish" | "done" => Ok(Input::Finish),
        "r" | "reset" => Ok(Input::Reset),
        "shuffle" => Ok(Input::Reshuffle),
        "s" | "size" => Ok(Input::Resize(parse_number(argument, "size")?)),
        "auto" => match argument.map(str::to_ascii_lowercase).as_deref() {
            Some("on") => Ok(Input::AutoAdvance(true)),
            Some("off") => Ok(Input::AutoAdvance(false)),
            Some(other) => Err(InputError::InvalidToggle(other.to_string())),
            None => Err(InputError::InvalidToggle(String::new())),
        },
        "x" | "explain" => Ok(Input::Explain),
        "h" | "help" | "?" => Ok(Input::Help),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        _ if looks_like_answer(line) => Ok(Input::Answer(Answer::parse_keys(line)?)),
        _ => Err(InputError::UnknownCommand(line.to_string())),
    }
}

/// A 1-based positive number.
fn parse_number(argument: Option<&str>, command: &'static str) -> Result<usize, InputError> {
    let raw = argument.ok_or(InputError::MissingNumber(command))?;
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(InputError::InvalidNumber(raw.to_string())),
        Ok(number) => Ok(number),
    }
}

fn looks_like_answer(line: &str) -> bool {
    line.split(',').all(|part| {
        let mut chars = part.trim().chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::OptionKey;

    fn key(raw: &str) -> OptionKey {
        OptionKey::new(raw).unwrap()
    }

    #[test]
    fn parses_single_and_multiple_answers() {
        assert_eq!(parse("b").unwrap(), Input::Answer(Answer::single(key("B"))));
        assert_eq!(
            parse(" a, D ").unwrap(),
            Input::Answer(Answer::from_keys([key("A"), key("D")]))
        );
        assert_eq!(parse("E").unwrap(), Input::Answer(Answer::single(key("E"))));
        assert_eq!(parse("F").unwrap(), Input::Answer(Answer::single(key("F"))));
    }

    #[test]
    fn parses_navigation_commands() {
        assert_eq!(parse("n").unwrap(), Input::Next);
        assert_eq!(parse("PREV").unwrap(), Input::Previous);
        assert_eq!(parse("j 3").unwrap(), Input::Jump(2));
        assert_eq!(parse("finish").unwrap(), Input::Finish);
        assert_eq!(parse("q").unwrap(), Input::Quit);
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse("s 15").unwrap(), Input::Resize(15));
        assert_eq!(parse("r").unwrap(), Input::Reset);
        assert_eq!(parse("shuffle").unwrap(), Input::Reshuffle);
        assert_eq!(parse("auto on").unwrap(), Input::AutoAdvance(true));
        assert_eq!(parse("auto OFF").unwrap(), Input::AutoAdvance(false));
        assert_eq!(parse("x").unwrap(), Input::Explain);
        assert_eq!(parse("help").unwrap(), Input::Help);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse("   "), Err(InputError::Empty));
        assert_eq!(parse("j"), Err(InputError::MissingNumber("jump")));
        assert_eq!(parse("j 0"), Err(InputError::InvalidNumber("0".into())));
        assert_eq!(parse("s many"), Err(InputError::InvalidNumber("many".into())));
        assert_eq!(parse("auto maybe"), Err(InputError::InvalidToggle("maybe".into())));
        assert!(matches!(parse("hello"), Err(InputError::UnknownCommand(_))));
        assert!(matches!(parse("a,,b"), Err(InputError::UnknownCommand(_))));
    }
}
