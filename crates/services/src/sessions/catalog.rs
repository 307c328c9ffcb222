use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{BankId, QuizSettings};
use storage::repository::{BankRepository, BankSummary, Storage};

use super::service::QuizSession;
use crate::error::SessionServiceError;

/// Entry point for the UI: lists banks and starts sessions over them.
#[derive(Clone)]
pub struct QuizCatalog {
    clock: Clock,
    banks: Arc<dyn BankRepository>,
}

impl QuizCatalog {
    #[must_use]
    pub fn new(clock: Clock, banks: Arc<dyn BankRepository>) -> Self {
        Self { clock, banks }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(clock, Arc::clone(&storage.banks))
    }

    /// List the available banks.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` on repository failures.
    pub async fn list_banks(&self) -> Result<Vec<BankSummary>, SessionServiceError> {
        Ok(self.banks.list_banks().await?)
    }

    /// Start a session over the bank `bank_id`.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if the bank is unknown, otherwise see
    /// [`QuizSession::start`].
    pub async fn start_session(
        &self,
        bank_id: &BankId,
        settings: QuizSettings,
    ) -> Result<QuizSession, SessionServiceError> {
        let bank = self.banks.get_bank(bank_id).await?;
        QuizSession::start(bank, settings, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionBank, QuestionDraft};
    use quiz_core::time::fixed_clock;
    use storage::repository::{InMemoryRepository, StorageError};

    fn catalog() -> QuizCatalog {
        let questions = (1..=4)
            .map(|id| {
                QuestionDraft::new(id, format!("Q{id}"))
                    .option("A", "a")
                    .option("B", "b")
                    .correct("B")
                    .validate()
                    .unwrap()
            })
            .collect();
        let bank = QuestionBank::new(BankId::new("intro").unwrap(), "Intro", questions).unwrap();
        let repo = InMemoryRepository::with_banks([bank]).unwrap();
        QuizCatalog::new(fixed_clock(), Arc::new(repo))
    }

    #[tokio::test]
    async fn starts_a_session_for_a_known_bank() {
        let catalog = catalog();
        let banks = catalog.list_banks().await.unwrap();
        assert_eq!(banks.len(), 1);

        let settings = QuizSettings::default().with_question_count(2).unwrap();
        let session = catalog.start_session(&banks[0].id, settings).await.unwrap();
        assert_eq!(session.state().total(), 2);
        assert_eq!(session.bank().title(), "Intro");
    }

    #[tokio::test]
    async fn unknown_bank_is_a_storage_error() {
        let err = catalog()
            .start_session(&BankId::new("missing").unwrap(), QuizSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionServiceError::Storage(StorageError::NotFound(_))
        ));
    }
}
