use quiz_core::model::{BankId, Category};
use storage::json::load_bank_dir;
use storage::repository::{BankRepository, Storage, StorageError};

const BANK_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../banks");

#[test]
fn bundled_banks_all_validate() {
    let banks = load_bank_dir(BANK_DIR).expect("load bundled banks");
    let ids: Vec<_> = banks.iter().map(|b| b.id().as_str().to_string()).collect();
    assert_eq!(
        ids,
        vec![
            "ai-practitioner",
            "ml-engineer-associate",
            "solutions-architect-associate"
        ]
    );
    for bank in &banks {
        assert!(bank.len() >= 8, "{} is too small", bank.id());
        assert!(bank.all_categories().count() >= 3, "{} needs categories", bank.id());
        assert!(
            bank.questions().iter().any(|q| q.is_multi_select()),
            "{} has no multi-select question",
            bank.id()
        );
        assert!(
            bank.all_categories().all(|c| !c.is_uncategorized()),
            "{} has an uncategorized question",
            bank.id()
        );
    }
}

#[tokio::test]
async fn json_dir_storage_serves_banks() {
    let storage = Storage::json_dir(BANK_DIR).expect("storage");
    let list = storage.banks.list_banks().await.unwrap();
    assert_eq!(list.len(), 3);

    let id = BankId::new("solutions-architect-associate").unwrap();
    let bank = storage.banks.get_bank(&id).await.unwrap();
    let summary = list.iter().find(|s| s.id == id).unwrap();
    assert_eq!(summary.question_count, bank.len());
    assert_eq!(summary.title, bank.title());

    let resilient = Category::new("Design Resilient Architectures");
    assert_eq!(bank.questions_in(&resilient).count(), 2);
}

#[tokio::test]
async fn unknown_bank_is_not_found() {
    let storage = Storage::json_dir(BANK_DIR).unwrap();
    let err = storage
        .banks
        .get_bank(&BankId::new("cloud-practitioner").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[test]
fn selects_a_subset_from_a_bundled_bank() {
    let banks = load_bank_dir(BANK_DIR).unwrap();
    let bank = &banks[0];
    let categories = bank.all_categories().count();
    let subset = bank.select_subset(categories, Some(11)).unwrap();
    assert_eq!(subset.len(), categories);

    let mut seen: Vec<_> = subset.iter().map(|q| q.category().clone()).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), categories);
}
