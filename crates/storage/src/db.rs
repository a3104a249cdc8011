use chrono::NaiveDate;
use gastobot_core::{ExpenseRecord, Money};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use thiserror::Error;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("stored amount '{0}' is not a valid decimal")]
    CorruptAmount(String),
}

/// An expense row as persisted, including the storage-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredExpense {
    pub id: i64,
    pub amount: Money,
    pub description: String,
    pub payment_method: String,
    pub date: NaiveDate,
}

pub async fn create_db(path: &Path) -> Result<DbPool, StorageError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // Amounts are stored as canonical decimal text so nothing is lost to
    // float representation; dates are ISO `YYYY-MM-DD` text, which sorts
    // chronologically.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount TEXT NOT NULL,
            description TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Appends one validated record. Returns the assigned row id.
pub async fn insert_expense(pool: &DbPool, record: &ExpenseRecord) -> Result<i64, StorageError> {
    let result = sqlx::query(
        "INSERT INTO expenses (amount, description, payment_method, date) VALUES (?, ?, ?, ?)",
    )
    .bind(record.amount.to_decimal().to_string())
    .bind(&record.description)
    .bind(&record.payment_method)
    .bind(record.date.to_string())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// The most recent expenses, newest date first (ties broken by insertion
/// order, latest first).
pub async fn recent_expenses(pool: &DbPool, limit: i64) -> Result<Vec<StoredExpense>, StorageError> {
    let rows = sqlx::query_as::<_, (i64, String, String, String, NaiveDate)>(
        "SELECT id, amount, description, payment_method, date FROM expenses \
         ORDER BY date DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            let amount: Money = r
                .1
                .parse()
                .map_err(|_| StorageError::CorruptAmount(r.1.clone()))?;
            Ok(StoredExpense {
                id: r.0,
                amount,
                description: r.2,
                payment_method: r.3,
                date: r.4,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gastobot_core::{parse_expense, PaymentMethodRegistry};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 20).unwrap()
    }

    async fn test_db() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_db(&dir.path().join("gastos.db")).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let (_dir, pool) = test_db().await;
        let registry = PaymentMethodRegistry::default();

        let record = parse_expense("150.75,Cena con amigos,TC BBVA", &registry, today()).unwrap();
        let id = insert_expense(&pool, &record).await.unwrap();
        assert!(id > 0);

        let stored = recent_expenses(&pool, 10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].amount, record.amount);
        assert_eq!(stored[0].description, "Cena con amigos");
        assert_eq!(stored[0].payment_method, "TC BBVA");
        assert_eq!(stored[0].date, today());
    }

    #[tokio::test]
    async fn recent_expenses_orders_newest_first() {
        let (_dir, pool) = test_db().await;
        let registry = PaymentMethodRegistry::default();

        let older = parse_expense("50,Café,Efectivo,12/07/2025", &registry, today()).unwrap();
        let newer = parse_expense("3000,Alquiler,TD ICBC,01/08/2025", &registry, today()).unwrap();
        insert_expense(&pool, &older).await.unwrap();
        insert_expense(&pool, &newer).await.unwrap();

        let stored = recent_expenses(&pool, 10).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].description, "Alquiler");
        assert_eq!(stored[1].description, "Café");
    }

    #[tokio::test]
    async fn limit_caps_the_result() {
        let (_dir, pool) = test_db().await;
        let registry = PaymentMethodRegistry::default();

        for i in 0..5 {
            let line = format!("{i},Gasto {i},Efectivo");
            let record = parse_expense(&line, &registry, today()).unwrap();
            insert_expense(&pool, &record).await.unwrap();
        }

        let stored = recent_expenses(&pool, 3).await.unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gastos.db");
        let pool = create_db(&path).await.unwrap();
        drop(pool);
        // Reopening runs CREATE TABLE IF NOT EXISTS again.
        let pool = create_db(&path).await.unwrap();
        let stored = recent_expenses(&pool, 1).await.unwrap();
        assert!(stored.is_empty());
    }
}
