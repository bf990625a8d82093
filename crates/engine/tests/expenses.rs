use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    Category, Engine, EngineError, ExpenseKind, ExpensePatch, ExpenseUpdate, Money, NewExpense,
};
use migration::MigratorTrait;

async fn engine_with_users(users: &[&str]) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    for user in users {
        engine
            .register(user, &format!("{user}@example.com"), "s3cret-password")
            .await
            .unwrap();
    }
    (engine, db)
}

fn rent(amount_cents: i64) -> NewExpense {
    NewExpense {
        item: "Rent".to_string(),
        amount: Money::new(amount_cents),
        category: Category::CustosFixos,
        kind: ExpenseKind::Fixed,
    }
}

#[tokio::test]
async fn create_then_list_round_trip() {
    let (engine, _db) = engine_with_users(&["alice"]).await;

    let created = engine.create_expense("alice", rent(120_000)).await.unwrap();
    assert_eq!(created.amount, Money::new(120_000));
    assert_eq!(created.category, Category::CustosFixos);
    assert_eq!(created.kind, ExpenseKind::Fixed);

    let stored = engine.expense("alice", created.id).await.unwrap();
    let listed = engine.expenses("alice").await.unwrap();
    assert_eq!(listed, vec![stored]);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let (engine, _db) = engine_with_users(&["alice"]).await;

    let mut ids = Vec::new();
    for item in ["first", "second", "third"] {
        let expense = engine
            .create_expense(
                "alice",
                NewExpense {
                    item: item.to_string(),
                    amount: Money::new(100),
                    category: Category::Lazer,
                    kind: ExpenseKind::Variable,
                },
            )
            .await
            .unwrap();
        ids.push(expense.id);
        // keep created_at strictly increasing
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let listed = engine.expenses("alice").await.unwrap();
    let listed_ids: Vec<_> = listed.iter().map(|e| e.id).collect();
    ids.reverse();
    assert_eq!(listed_ids, ids);
}

#[tokio::test]
async fn lists_never_mix_users() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;

    engine.create_expense("alice", rent(120_000)).await.unwrap();

    assert!(engine.expenses("bob").await.unwrap().is_empty());
    assert_eq!(engine.expenses("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn patch_changes_only_supplied_fields() {
    let (engine, _db) = engine_with_users(&["alice"]).await;

    let created = engine.create_expense("alice", rent(120_000)).await.unwrap();
    let created = engine.expense("alice", created.id).await.unwrap();

    let patched = engine
        .patch_expense(
            "alice",
            created.id,
            ExpensePatch {
                amount: Some(Money::new(130_000)),
                ..ExpensePatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.amount, Money::new(130_000));
    assert_eq!(patched.item, created.item);
    assert_eq!(patched.category, created.category);
    assert_eq!(patched.kind, created.kind);
    assert_eq!(patched.created_at, created.created_at);
}

#[tokio::test]
async fn update_replaces_all_editable_fields_but_not_created_at() {
    let (engine, _db) = engine_with_users(&["alice"]).await;

    let created = engine.create_expense("alice", rent(120_000)).await.unwrap();
    let created = engine.expense("alice", created.id).await.unwrap();

    let updated = engine
        .update_expense(
            "alice",
            created.id,
            ExpenseUpdate {
                item: "Groceries".to_string(),
                amount: Money::new(25_990),
                category: Category::Alimentacao,
                kind: ExpenseKind::Variable,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.item, "Groceries");
    assert_eq!(updated.amount, Money::new(25_990));
    assert_eq!(updated.category, Category::Alimentacao);
    assert_eq!(updated.kind, ExpenseKind::Variable);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let (engine, _db) = engine_with_users(&["alice"]).await;

    let created = engine.create_expense("alice", rent(120_000)).await.unwrap();
    engine.delete_expense("alice", created.id).await.unwrap();

    let err = engine.expense("alice", created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.expenses("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn foreign_expense_looks_absent() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;

    let created = engine.create_expense("alice", rent(120_000)).await.unwrap();

    let foreign = engine.expense("bob", created.id).await.unwrap_err();
    let absent = engine.expense("bob", Uuid::new_v4()).await.unwrap_err();

    // same error either way, so an id probe leaks nothing
    assert!(matches!(foreign, EngineError::KeyNotFound(_)));
    assert!(matches!(absent, EngineError::KeyNotFound(_)));

    let delete = engine.delete_expense("bob", created.id).await.unwrap_err();
    assert!(matches!(delete, EngineError::KeyNotFound(_)));
    assert_eq!(engine.expenses("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn expenses_of_requires_existing_user() {
    let (engine, _db) = engine_with_users(&["alice", "bob"]).await;

    engine.create_expense("alice", rent(120_000)).await.unwrap();

    let of_alice = engine.expenses_of("alice").await.unwrap();
    assert_eq!(of_alice.len(), 1);

    // existing user with no rows: empty list, not an error
    assert!(engine.expenses_of("bob").await.unwrap().is_empty());

    let unknown = engine.expenses_of("nobody").await.unwrap_err();
    assert!(matches!(unknown, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn create_rejects_amounts_over_ten_digits() {
    let (engine, _db) = engine_with_users(&["alice"]).await;

    let err = engine
        .create_expense("alice", rent(10_000_000_000))
        .await
        .unwrap_err();

    match err {
        EngineError::Validation(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "valor");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(engine.expenses("alice").await.unwrap().is_empty());

    // the cap itself is still storable
    engine.create_expense("alice", rent(9_999_999_999)).await.unwrap();
}

#[tokio::test]
async fn create_rejects_bad_fields() {
    let (engine, _db) = engine_with_users(&["alice"]).await;

    let err = engine
        .create_expense(
            "alice",
            NewExpense {
                item: "  ".to_string(),
                amount: Money::new(-100),
                category: Category::Lazer,
                kind: ExpenseKind::Variable,
            },
        )
        .await
        .unwrap_err();

    match err {
        EngineError::Validation(fields) => {
            let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names, vec!["item", "valor"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let err = engine
        .create_expense(
            "alice",
            NewExpense {
                item: "x".repeat(101),
                amount: Money::new(100),
                category: Category::Lazer,
                kind: ExpenseKind::Variable,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}
