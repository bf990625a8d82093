use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, Money};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register("alice", "alice@example.com", "s3cret-password")
        .await
        .unwrap();

    let username = engine
        .verify_credentials("alice", "s3cret-password")
        .await
        .unwrap();
    assert_eq!(username, "alice");
}

#[tokio::test]
async fn duplicate_username_fails_on_username_field() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register("alice", "alice@example.com", "s3cret-password")
        .await
        .unwrap();
    let err = engine
        .register("alice", "other@example.com", "another-password")
        .await
        .unwrap_err();

    match err {
        EngineError::Validation(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "username");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register("alice", "alice@example.com", "s3cret-password")
        .await
        .unwrap();

    let wrong_password = engine
        .verify_credentials("alice", "wrong")
        .await
        .unwrap_err();
    let unknown_user = engine
        .verify_credentials("nobody", "wrong")
        .await
        .unwrap_err();

    assert_eq!(wrong_password, EngineError::InvalidCredentials);
    assert_eq!(unknown_user, EngineError::InvalidCredentials);
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn register_collects_all_field_errors() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.register("", "not-an-email", "short").await.unwrap_err();

    match err {
        EngineError::Validation(fields) => {
            let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
            assert!(names.contains(&"username"));
            assert!(names.contains(&"email"));
            assert!(names.contains(&"password"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn registration_creates_profile_with_zero_income() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register("alice", "alice@example.com", "s3cret-password")
        .await
        .unwrap();

    assert_eq!(engine.monthly_income("alice").await.unwrap(), Money::ZERO);
}

#[tokio::test]
async fn set_income_replaces_value_and_rejects_negative() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register("alice", "alice@example.com", "s3cret-password")
        .await
        .unwrap();

    engine
        .set_monthly_income("alice", Money::new(350_000))
        .await
        .unwrap();
    assert_eq!(
        engine.monthly_income("alice").await.unwrap(),
        Money::new(350_000)
    );

    let err = engine
        .set_monthly_income("alice", Money::new(-1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    // failed update leaves the previous value in place
    assert_eq!(
        engine.monthly_income("alice").await.unwrap(),
        Money::new(350_000)
    );
}

#[tokio::test]
async fn income_is_capped_at_ten_digits() {
    let (engine, _db) = engine_with_db().await;

    engine
        .register("alice", "alice@example.com", "s3cret-password")
        .await
        .unwrap();

    let err = engine
        .set_monthly_income("alice", Money::new(10_000_000_000))
        .await
        .unwrap_err();
    match err {
        EngineError::Validation(fields) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "renda_mensal");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(engine.monthly_income("alice").await.unwrap(), Money::ZERO);

    engine
        .set_monthly_income("alice", Money::new(9_999_999_999))
        .await
        .unwrap();
    assert_eq!(
        engine.monthly_income("alice").await.unwrap(),
        Money::new(9_999_999_999)
    );
}
