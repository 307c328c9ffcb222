#![forbid(unsafe_code)]

//! Question-bank sources: JSON bank files and the repository the services read from.

pub mod json;
pub mod records;
pub mod repository;

pub use repository::{BankRepository, BankSummary, InMemoryRepository, Storage, StorageError};
