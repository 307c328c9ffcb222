#![forbid(unsafe_code)]

pub mod ai;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use ai::{InferenceParams, ModelInvoker, ModelTransport, PromptTemplate, Provider};
pub use error::{InvokeError, SessionServiceError};
pub use sessions::{
    AnswerFeedback, CategoryScore, QuestionView, QuizCatalog, QuizSession, ResultsView,
    ReviewItem, SessionProgress,
};
