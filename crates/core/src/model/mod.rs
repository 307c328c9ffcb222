mod answer;
mod bank;
mod category;
mod ids;
mod question;
mod session;
mod settings;

pub use answer::{Answer, OptionKey, OptionKeyError};
pub use bank::{BankError, Categories, QuestionBank};
pub use category::Category;
pub use ids::{BankId, BankIdError, ParseIdError, QuestionId};
pub use question::{AnswerOption, Question, QuestionDraft, QuestionError};
pub use session::{QuizError, SessionState};
pub use settings::{
    AiSettings, AiSettingsDraft, AiSettingsError, DEFAULT_PASS_MARK_PERCENT,
    DEFAULT_QUESTION_COUNT, DEFAULT_REGION, QuizSettings, QuizSettingsDraft, QuizSettingsError,
};
