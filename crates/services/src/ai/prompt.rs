use std::collections::HashMap;

use quiz_core::model::{Answer, Question};

use crate::error::InvokeError;

const EXPLAIN_TEMPLATE: &str = "\
You are a tutor helping a learner prepare for an AWS certification exam.

Topic: {category}
Question: {question}

Options:
{options}
Correct answer: {correct}
Learner's answer: {selection}

Explain in a few short paragraphs why the correct answer is right and why each \
other option is wrong. Name the AWS services involved.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Variable(String),
}

/// Text with `{name}` placeholders; `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::InvalidTemplate` for an unclosed `{`, a stray `}`, or
    /// an empty or malformed placeholder name.
    pub fn new(source: &str) -> Result<Self, InvokeError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                            Some(c) => {
                                return Err(InvokeError::InvalidTemplate(format!(
                                    "unexpected {c:?} in placeholder"
                                )));
                            }
                            None => {
                                return Err(InvokeError::InvalidTemplate(
                                    "unclosed placeholder".into(),
                                ));
                            }
                        }
                    }
                    if name.is_empty() {
                        return Err(InvokeError::InvalidTemplate("empty placeholder".into()));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Variable(name));
                }
                '}' => {
                    return Err(InvokeError::InvalidTemplate("unmatched '}'".into()));
                }
                c => text.push(c),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(Self { segments })
    }

    /// Placeholder names in first-use order, without duplicates.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder. Extra values are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::MissingVariable` naming the first placeholder without a value.
    pub fn format<'a>(
        &self,
        values: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<String, InvokeError> {
        let values: HashMap<&str, &str> = values.into_iter().collect();
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = values
                        .get(name.as_str())
                        .ok_or_else(|| InvokeError::MissingVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Prompt asking a model to explain `question`; `selection` is what the learner picked.
///
/// # Errors
///
/// Returns `InvokeError` if the built-in template fails to render.
pub fn explain_prompt(
    question: &Question,
    selection: Option<&Answer>,
) -> Result<String, InvokeError> {
    let options: String = question
        .options()
        .iter()
        .map(|option| format!("{}. {}\n", option.key, option.text))
        .collect();
    let correct = question.correct_answer().to_string();
    let selection = selection.map_or_else(|| "not answered yet".to_string(), ToString::to_string);

    PromptTemplate::new(EXPLAIN_TEMPLATE)?.format([
        ("category", question.category().as_str()),
        ("question", question.text()),
        ("options", options.as_str()),
        ("correct", correct.as_str()),
        ("selection", selection.as_str()),
    ])
}
