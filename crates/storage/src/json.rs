//! Loading question banks from JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use quiz_core::model::QuestionBank;

use crate::records::BankFile;
use crate::repository::StorageError;

/// Parse and validate a bank from JSON text.
///
/// # Errors
///
/// Returns `StorageError::Parse` for malformed JSON and validation errors from
/// [`BankFile::into_bank`].
pub fn parse_bank(json: &str) -> Result<QuestionBank, StorageError> {
    let file: BankFile =
        serde_json::from_str(json).map_err(|e| StorageError::Parse(e.to_string()))?;
    file.into_bank()
}

/// Load one bank file.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be read, otherwise see [`parse_bank`].
pub fn load_bank_file(path: impl AsRef<Path>) -> Result<QuestionBank, StorageError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;
    let bank = parse_bank(&raw).map_err(|e| match e {
        StorageError::Parse(msg) => StorageError::Parse(format!("{}: {msg}", path.display())),
        other => other,
    })?;
    tracing::debug!(
        path = %path.display(),
        bank = %bank.id(),
        questions = bank.len(),
        "loaded question bank"
    );
    Ok(bank)
}

/// Load every `*.json` file in `dir`, in file-name order.
///
/// # Errors
///
/// Returns the first `StorageError` hit; a directory without bank files is an
/// `StorageError::Io` error.
pub fn load_bank_dir(dir: impl AsRef<Path>) -> Result<Vec<QuestionBank>, StorageError> {
    let dir = dir.as_ref();
    let entries =
        fs::read_dir(dir).map_err(|e| StorageError::Io(format!("{}: {e}", dir.display())))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| StorageError::Io(format!("{}: {e}", dir.display())))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(StorageError::Io(format!(
            "{}: no question bank files found",
            dir.display()
        )));
    }

    let banks = paths
        .iter()
        .map(|path| load_bank_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(dir = %dir.display(), banks = banks.len(), "question banks loaded");
    Ok(banks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"{
        "id": "mini",
        "title": "Mini bank",
        "questions": [
            {
                "id": 1,
                "question": "What does S3 stand for?",
                "options": {"A": "Simple Storage Service", "B": "Secure Server Suite"},
                "correct_answer": "A",
                "explanation": {"A": "Correct.", "B": "Not a thing."},
                "category": "Storage"
            },
            {
                "id": 2,
                "question": "Pick the compute services.",
                "options": {"A": "EC2", "B": "Lambda", "C": "S3"},
                "correct_answer": ["A", "B"]
            }
        ]
    }"#;

    #[test]
    fn parses_a_bank() {
        let bank = parse_bank(BANK).unwrap();
        assert_eq!(bank.id().as_str(), "mini");
        assert_eq!(bank.len(), 2);
        let categories: Vec<_> = bank.all_categories().map(|c| c.as_str()).collect();
        assert_eq!(categories, vec!["Storage", "Uncategorized"]);
    }

    #[test]
    fn keeps_options_in_file_order() {
        let bank = parse_bank(
            r#"{"id": "order", "title": "Order", "questions": [{
                "id": 1,
                "question": "Which comes first?",
                "options": {"C": "third", "A": "first", "B": "second"},
                "correct_answer": "A"
            }]}"#,
        )
        .unwrap();
        let keys: Vec<_> = bank.questions()[0]
            .options()
            .iter()
            .map(|o| o.key.as_str())
            .collect();
        assert_eq!(keys, vec!["C", "A", "B"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_bank("{ not json").unwrap_err();
        assert!(matches!(err, StorageError::Parse(_)));
    }

    #[test]
    fn empty_bank_is_invalid() {
        let err = parse_bank(r#"{"id": "x", "title": "X", "questions": []}"#).unwrap_err();
        assert!(matches!(err, StorageError::InvalidBank { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_bank_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
