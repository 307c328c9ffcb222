//! The line-oriented quiz loop.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use services::{InferenceParams, ModelInvoker, QuizSession};

use crate::input::{self, HELP, Input};
use crate::render;

/// What the loop should do after a command has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Ask the model about the current question; needs the async invoker.
    Explain,
    Quit,
}

/// Apply one parsed input to the session and write what the learner should see.
///
/// Rejected operations are reported on `out`; the session keeps its last valid state.
///
/// # Errors
///
/// Returns an `io::Error` only when writing to `out` fails.
pub fn apply(session: &mut QuizSession, input: Input, out: &mut impl Write) -> io::Result<Flow> {
    let was_complete = session.is_complete();
    let navigates = matches!(input, Input::Next | Input::Previous | Input::Jump(_));
    let outcome = match input {
        Input::Answer(answer) => match session.answer_current(answer) {
            Ok(feedback) => {
                render::write_feedback(out, &feedback)?;
                Ok(())
            }
            Err(err) => Err(err),
        },
        Input::Next => {
            session.next();
            Ok(())
        }
        Input::Previous => {
            session.previous();
            Ok(())
        }
        Input::Jump(index) => session.jump_to(index),
        Input::Finish => {
            let results = session.finish();
            render::write_results(out, &results)?;
            return after_results(out);
        }
        Input::Reset => session.reset(),
        Input::Reshuffle => session.reshuffle(),
        Input::Resize(count) => session.resize(count),
        Input::AutoAdvance(on) => {
            session.set_auto_advance(on);
            writeln!(out, "auto-advance {}", if on { "on" } else { "off" })?;
            Ok(())
        }
        Input::Explain => return Ok(Flow::Explain),
        Input::Help => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        Input::Quit => return Ok(Flow::Quit),
    };

    if let Err(err) = outcome {
        writeln!(out, "! {err}")?;
        return Ok(Flow::Continue);
    }

    if !was_complete && session.is_complete() {
        render::write_results(out, &session.results())?;
        return after_results(out);
    }
    // A finished session can still be browsed question by question.
    if !session.is_complete() || navigates {
        render::write_question(out, &session.current_view(), &session.progress())?;
    }
    Ok(Flow::Continue)
}

fn after_results(out: &mut impl Write) -> io::Result<Flow> {
    writeln!(out, "\nr to retry, shuffle for new questions, s N to resize, q to quit.")?;
    Ok(Flow::Continue)
}

/// Run the quiz on stdin/stdout until the learner quits or input ends.
///
/// # Errors
///
/// Returns an `io::Error` if the terminal cannot be read or written.
pub async fn run(mut session: QuizSession, invoker: ModelInvoker) -> io::Result<()> {
    let params = InferenceParams::default();
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    writeln!(
        stdout,
        "{}: {} questions. Type h for help.",
        session.bank().title(),
        session.state().total()
    )?;
    render::write_question(&mut stdout, &session.current_view(), &session.progress())?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let parsed = match input::parse(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                writeln!(stdout, "! {err}")?;
                continue;
            }
        };

        match apply(&mut session, parsed, &mut stdout)? {
            Flow::Continue => {}
            Flow::Quit => break,
            Flow::Explain => {
                if !invoker.enabled() {
                    writeln!(
                        stdout,
                        "! the AI tutor is off; set AWS_BEARER_TOKEN_BEDROCK to enable it"
                    )?;
                    continue;
                }
                writeln!(stdout, "Asking {} ...", invoker.default_model())?;
                let question = session.current_question();
                let selection = session.state().answer_for(question.id());
                match invoker.explain(question, selection, &params).await {
                    Ok(text) => writeln!(stdout, "\n{text}\n")?,
                    Err(err) => writeln!(stdout, "! {err}")?,
                }
            }
        }
    }

    tracing::debug!(complete = session.is_complete(), "quiz loop ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quiz_core::model::{BankId, QuestionBank, QuestionDraft, QuizSettingsDraft};
    use quiz_core::time::fixed_clock;

    use super::*;

    fn session(auto_advance: bool) -> QuizSession {
        let questions = (1..=3)
            .map(|id| {
                QuestionDraft::new(id, format!("Question {id}"))
                    .option("A", "yes")
                    .option("B", "no")
                    .correct("A")
                    .validate()
                    .unwrap()
            })
            .collect();
        let bank = QuestionBank::new(BankId::new("demo").unwrap(), "Demo", questions).unwrap();
        let settings = QuizSettingsDraft {
            question_count: Some(3),
            auto_advance,
            seed: Some(1),
            ..QuizSettingsDraft::default()
        }
        .validate()
        .unwrap();
        QuizSession::start(Arc::new(bank), settings, fixed_clock()).unwrap()
    }

    fn step(session: &mut QuizSession, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = apply(session, input::parse(line).unwrap(), &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn a_full_round_ends_with_results() {
        let mut session = session(true);
        for _ in 0..3 {
            let (_, text) = step(&mut session, "a");
            assert!(text.starts_with("Correct."));
        }
        assert!(!session.is_complete());

        let (flow, text) = step(&mut session, "n");
        assert_eq!(flow, Flow::Continue);
        assert!(session.is_complete());
        assert!(text.contains("Score: 3/3"));
        assert!(text.contains("PASSED"));
    }

    #[test]
    fn rejected_commands_are_reported() {
        let mut session = session(false);
        let (flow, text) = step(&mut session, "z");
        assert_eq!(flow, Flow::Continue);
        assert!(text.starts_with("! question 1 has no option Z"));
        assert!(session.state().answers().is_empty());

        let (_, text) = step(&mut session, "j 9");
        assert!(text.starts_with("! index 8 is out of range"));
        assert_eq!(session.progress().current_number, 1);
    }

    #[test]
    fn answers_after_finishing_are_refused_until_reset() {
        let mut session = session(false);
        step(&mut session, "finish");
        let (_, text) = step(&mut session, "a");
        assert!(text.contains("session already completed"));

        let (_, text) = step(&mut session, "r");
        assert!(!session.is_complete());
        assert!(text.contains("Question 1/3"));
    }

    #[test]
    fn finished_sessions_can_be_reviewed() {
        let mut session = session(false);
        step(&mut session, "a");
        step(&mut session, "finish");

        let (_, text) = step(&mut session, "j 2");
        assert_eq!(session.progress().current_number, 2);
        assert!(text.contains("Question 2/3"));
        assert!(!text.contains("Correct."));

        let (_, text) = step(&mut session, "p");
        assert!(text.contains("Question 1/3"));
        assert!(text.contains(" * A. yes"));
        assert!(text.contains("Correct."));

        // next never moves a finished session; it shows the same question again
        let (_, text) = step(&mut session, "n");
        assert!(text.contains("Question 1/3"));
        assert!(session.is_complete());
    }

    #[test]
    fn resize_and_explain_and_quit() {
        let mut session = session(false);
        let (_, text) = step(&mut session, "s 2");
        assert_eq!(session.state().total(), 2);
        assert!(text.contains("Question 1/2"));

        assert_eq!(step(&mut session, "x").0, Flow::Explain);
        assert_eq!(step(&mut session, "q").0, Flow::Quit);
    }
}
