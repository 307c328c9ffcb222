use std::sync::Arc;

use quiz_core::model::{Answer, BankId, OptionKey, QuizSettingsDraft};
use quiz_core::time::{fixed_clock, fixed_now};
use services::QuizCatalog;
use storage::json::parse_bank;
use storage::repository::InMemoryRepository;

const BANK: &str = r#"{
    "id": "smoke",
    "title": "Smoke bank",
    "questions": [
        {"id": 10, "question": "Q1", "options": {"A": "x", "B": "y"}, "correct_answer": "A", "category": "One"},
        {"id": 20, "question": "Q2", "options": {"A": "x", "B": "y"}, "correct_answer": "B", "category": "Two"},
        {"id": 30, "question": "Q3", "options": {"A": "x", "B": "y", "C": "z"}, "correct_answer": ["A", "C"], "category": "Three"},
        {"id": 40, "question": "Q4", "options": {"A": "x", "B": "y"}, "correct_answer": "A", "category": "One"}
    ]
}"#;

#[tokio::test]
async fn answering_everything_correctly_passes() {
    let bank = parse_bank(BANK).unwrap();
    let catalog = QuizCatalog::new(
        fixed_clock(),
        Arc::new(InMemoryRepository::with_banks([bank]).unwrap()),
    );
    let settings = QuizSettingsDraft {
        question_count: Some(4),
        seed: Some(3),
        ..QuizSettingsDraft::default()
    }
    .validate()
    .unwrap();

    let mut session = catalog
        .start_session(&BankId::new("smoke").unwrap(), settings)
        .await
        .unwrap();

    let ids: Vec<u32> = session
        .state()
        .questions()
        .iter()
        .map(|q| q.id().value())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    while !session.is_complete() {
        let correct = session.current_question().correct_answer().clone();
        let feedback = session.answer_current(correct).unwrap();
        assert!(feedback.is_correct);
        session.next();
    }

    let results = session.results();
    assert_eq!(results.score.correct, 4);
    assert!(results.passed);
    assert_eq!(results.categories.len(), 3);
    assert_eq!(results.completed_at, Some(fixed_now()));
}

#[tokio::test]
async fn partial_multi_select_gets_no_credit() {
    let bank = parse_bank(BANK).unwrap();
    let catalog = QuizCatalog::new(
        fixed_clock(),
        Arc::new(InMemoryRepository::with_banks([bank]).unwrap()),
    );
    let mut session = catalog
        .start_session(&BankId::new("smoke").unwrap(), Default::default())
        .await
        .unwrap();

    let index = session
        .state()
        .questions()
        .iter()
        .position(|q| q.is_multi_select())
        .unwrap();
    session.jump_to(index).unwrap();
    let feedback = session
        .answer_current(Answer::from_keys([OptionKey::new("A").unwrap()]))
        .unwrap();
    assert!(!feedback.is_correct);

    let results = session.finish();
    assert_eq!(results.score.correct, 0);
    assert_eq!(results.score.answered, 1);
    assert!(!results.passed);
}
