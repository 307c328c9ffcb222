use thiserror::Error;

use crate::model::{
    AiSettingsError, BankError, BankIdError, OptionKeyError, QuestionError, QuizError,
    QuizSettingsError,
};

/// Any failure raised by the core crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    BankId(#[from] BankIdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    OptionKey(#[from] OptionKeyError),
    #[error(transparent)]
    QuizSettings(#[from] QuizSettingsError),
    #[error(transparent)]
    AiSettings(#[from] AiSettingsError),
}
