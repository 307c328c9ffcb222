//! Plain-text rendering of quiz views.

use std::io::{self, Write};

use services::{AnswerFeedback, QuestionView, ResultsView, SessionProgress};
use storage::repository::BankSummary;

pub fn write_banks(out: &mut impl Write, banks: &[BankSummary]) -> io::Result<()> {
    if banks.is_empty() {
        return writeln!(out, "No question banks found.");
    }
    for bank in banks {
        writeln!(
            out,
            "{:<32} {:>3} questions  {}",
            bank.id.as_str(),
            bank.question_count,
            bank.title
        )?;
        writeln!(out, "{:<32} {}", "", bank.categories.join(" | "))?;
    }
    Ok(())
}

pub fn write_question(
    out: &mut impl Write,
    view: &QuestionView,
    progress: &SessionProgress,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Question {}/{}  [{}]  answered {}/{}",
        view.number, view.total, view.category, progress.answered, progress.total
    )?;
    writeln!(out, "{}", view.text)?;
    if view.multi_select {
        writeln!(out, "(select all that apply, e.g. a,c)")?;
    }
    for option in &view.options {
        let mark = if option.selected { '*' } else { ' ' };
        writeln!(out, " {mark} {}. {}", option.key, option.text)?;
    }
    if let Some(feedback) = &view.feedback {
        write_feedback(out, feedback)?;
    }
    Ok(())
}

pub fn write_feedback(out: &mut impl Write, feedback: &AnswerFeedback) -> io::Result<()> {
    if feedback.is_correct {
        writeln!(out, "Correct.")?;
    } else {
        writeln!(out, "Incorrect. Correct answer: {}", feedback.correct_answer)?;
    }
    for (key, explanation) in &feedback.explanations {
        writeln!(out, "   {key}: {explanation}")?;
    }
    Ok(())
}

pub fn write_results(out: &mut impl Write, results: &ResultsView) -> io::Result<()> {
    let score = &results.score;
    writeln!(out)?;
    writeln!(
        out,
        "Score: {}/{} ({:.1}%), {} unanswered",
        score.correct,
        score.total,
        results.percentage,
        score.unanswered()
    )?;
    writeln!(
        out,
        "{} (pass mark {}%)",
        if results.passed { "PASSED" } else { "NOT PASSED" },
        results.pass_mark_percent
    )?;
    if let Some(duration) = results.duration() {
        writeln!(
            out,
            "Time: {}m {:02}s",
            duration.num_minutes(),
            duration.num_seconds() % 60
        )?;
    }

    writeln!(out, "\nBy category:")?;
    for category in &results.categories {
        writeln!(
            out,
            "  {:<48} {}/{}",
            category.category.as_str(),
            category.correct,
            category.total
        )?;
    }

    let missed: Vec<_> = results.items.iter().filter(|item| !item.is_correct).collect();
    if !missed.is_empty() {
        writeln!(out, "\nReview:")?;
        for item in missed {
            let yours = item
                .selection
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            writeln!(out, "  {}. {}", item.number, item.text)?;
            writeln!(out, "     yours: {yours}  correct: {}", item.correct_answer)?;
        }
    }
    Ok(())
}
