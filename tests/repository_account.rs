mod common;

use sqlx::PgPool;
use std::sync::Arc;
use shortly::domain::entities::NewAccount;
use shortly::domain::repositories::AccountRepository;
use shortly::error::AppError;
use shortly::infrastructure::persistence::PgAccountRepository;

fn new_account(email: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        name: "Ann".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    }
}

#[sqlx::test]
async fn test_create_account(pool: PgPool) {
    let repo = PgAccountRepository::new(Arc::new(pool));

    let account = repo.create(new_account("ann@example.com")).await.unwrap();

    assert_eq!(account.email, "ann@example.com");
    assert_eq!(account.name, "Ann");
    assert!(account.is_active);
}

#[sqlx::test]
async fn test_create_duplicate_email_conflicts(pool: PgPool) {
    let repo = PgAccountRepository::new(Arc::new(pool));

    repo.create(new_account("ann@example.com")).await.unwrap();
    let result = repo.create(new_account("ann@example.com")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_email_exists(pool: PgPool) {
    let repo = PgAccountRepository::new(Arc::new(pool));

    assert!(!repo.email_exists("ann@example.com").await.unwrap());
    repo.create(new_account("ann@example.com")).await.unwrap();
    assert!(repo.email_exists("ann@example.com").await.unwrap());
}

#[sqlx::test]
async fn test_find_active_by_email_skips_deactivated(pool: PgPool) {
    let id = common::insert_account(&pool, "gone@example.com").await;
    sqlx::query("UPDATE accounts SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let repo = PgAccountRepository::new(Arc::new(pool));

    assert!(repo.find_active_by_email("gone@example.com").await.unwrap().is_none());
    // Still visible by id so callers can tell it apart.
    let account = repo.find_by_id(id).await.unwrap().unwrap();
    assert!(!account.is_active);
}

#[sqlx::test]
async fn test_update_password(pool: PgPool) {
    let repo = PgAccountRepository::new(Arc::new(pool));
    let account = repo.create(new_account("ann@example.com")).await.unwrap();

    assert!(repo.update_password(account.id, "new-hash").await.unwrap());

    let reloaded = repo.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(reloaded.password_hash, "new-hash");

    assert!(!repo.update_password(999_999, "x").await.unwrap());
}
