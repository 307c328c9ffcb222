use async_trait::async_trait;
use quiz_core::model::{BankError, BankId, BankIdError, QuestionBank, QuestionError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by bank sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("bank {0} not found")]
    NotFound(BankId),

    #[error("bank {0} is defined more than once")]
    Conflict(BankId),

    #[error("io error: {0}")]
    Io(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    InvalidId(#[from] BankIdError),

    #[error("bank {bank}, question {question}: {source}")]
    InvalidQuestion {
        bank: BankId,
        question: u32,
        #[source]
        source: QuestionError,
    },

    #[error("bank {bank}: {source}")]
    InvalidBank {
        bank: BankId,
        #[source]
        source: BankError,
    },

    #[error("connection error: {0}")]
    Connection(String),
}

/// Listing entry for a bank; enough to render a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankSummary {
    pub id: BankId,
    pub title: String,
    pub question_count: usize,
    pub categories: Vec<String>,
}

impl BankSummary {
    #[must_use]
    pub fn from_bank(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id().clone(),
            title: bank.title().to_string(),
            question_count: bank.len(),
            categories: bank
                .all_categories()
                .map(|c| c.as_str().to_string())
                .collect(),
        }
    }
}

/// Read access to question banks.
#[async_trait]
pub trait BankRepository: Send + Sync {
    /// List all banks, sorted by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be read.
    async fn list_banks(&self) -> Result<Vec<BankSummary>, StorageError>;

    /// Fetch a bank by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_bank(&self, id: &BankId) -> Result<Arc<QuestionBank>, StorageError>;
}

/// In-memory bank registry; banks are immutable once inserted and shared via `Arc`.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    banks: Arc<Mutex<HashMap<BankId, Arc<QuestionBank>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            banks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Build a repository from already loaded banks.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if two banks share an id.
    pub fn with_banks(banks: impl IntoIterator<Item = QuestionBank>) -> Result<Self, StorageError> {
        let repo = Self::new();
        for bank in banks {
            repo.insert(bank)?;
        }
        Ok(repo)
    }

    /// Add a bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is taken.
    pub fn insert(&self, bank: QuestionBank) -> Result<(), StorageError> {
        let mut guard = self
            .banks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(bank.id()) {
            return Err(StorageError::Conflict(bank.id().clone()));
        }
        guard.insert(bank.id().clone(), Arc::new(bank));
        Ok(())
    }
}

#[async_trait]
impl BankRepository for InMemoryRepository {
    async fn list_banks(&self) -> Result<Vec<BankSummary>, StorageError> {
        let guard = self
            .banks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut summaries: Vec<_> = guard.values().map(|b| BankSummary::from_bank(b)).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn get_bank(&self, id: &BankId) -> Result<Arc<QuestionBank>, StorageError> {
        let guard = self
            .banks
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.clone()))
    }
}

/// Bank source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub banks: Arc<dyn BankRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            banks: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Load every `*.json` bank in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory or any bank file is unreadable or invalid.
    pub fn json_dir(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let banks = crate::json::load_bank_dir(dir)?;
        Ok(Self {
            banks: Arc::new(InMemoryRepository::with_banks(banks)?),
        })
    }
}
