mod catalog;
mod progress;
mod service;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionServiceError;
pub use catalog::QuizCatalog;
pub use progress::SessionProgress;
pub use service::QuizSession;
pub use view::{AnswerFeedback, CategoryScore, OptionView, QuestionView, ResultsView, ReviewItem};
