use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::path::Path;
use tally_core::{
    Account, AccountId, Amount, CoreError, DateRange, TransactionRecord, TransactionType,
};
use thiserror::Error;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// A transaction row as stored, with its owning account.
#[derive(Debug, Clone, Serialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub account_id: AccountId,
    #[serde(flatten)]
    pub record: TransactionRecord,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<AccountId>,
    pub range: DateRange,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
}

/// Fields to overwrite; `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub kind: Option<TransactionType>,
    pub amount: Option<Amount>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub transaction_count: i64,
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
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('Income', 'Expense')),
            amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
            description TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            transaction_date TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_account_date ON transactions (account_id, transaction_date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions (category)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

// ── Accounts ─────────────────────────────────────────────────────────────────

/// Returns `None` when an account with this name already exists.
pub async fn add_account(
    pool: &DbPool,
    account: &Account,
) -> Result<Option<AccountId>, StorageError> {
    let name = account.name.as_str();
    let result = sqlx::query("INSERT INTO accounts (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(&account.description)
        .execute(pool)
        .await;

    match result {
        Ok(done) => {
            let id = AccountId(done.last_insert_rowid());
            tracing::info!(%id, name, "account created");
            Ok(Some(id))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

type AccountRow = (i64, String, String, String);

fn account_from_row(r: AccountRow) -> Account {
    Account {
        id: Some(AccountId(r.0)),
        name: r.1,
        description: r.2,
        created_at: Some(r.3),
    }
}

pub async fn get_all_accounts(pool: &DbPool) -> Result<Vec<Account>, StorageError> {
    let rows = sqlx::query_as::<_, AccountRow>(
        "SELECT id, name, description, created_at FROM accounts ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(account_from_row).collect())
}

pub async fn get_account_by_name(
    pool: &DbPool,
    name: &str,
) -> Result<Option<Account>, StorageError> {
    let row = sqlx::query_as::<_, AccountRow>(
        "SELECT id, name, description, created_at FROM accounts WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(account_from_row))
}

/// Deletes the account and, through the foreign key, all of its transactions.
pub async fn delete_account(pool: &DbPool, id: AccountId) -> Result<bool, StorageError> {
    let done = sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(id.0)
        .execute(pool)
        .await?;
    Ok(done.rows_affected() > 0)
}

// ── Transactions ─────────────────────────────────────────────────────────────

pub async fn add_transaction(
    pool: &DbPool,
    account_id: AccountId,
    record: &TransactionRecord,
) -> Result<i64, StorageError> {
    let date = record.parsed_date()?;
    let cents = record.amount.to_paise()?;

    let done = sqlx::query(
        "INSERT INTO transactions (account_id, type, amount_cents, description, category, transaction_date) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(account_id.0)
    .bind(record.kind.as_str())
    .bind(cents)
    .bind(&record.description)
    .bind(&record.category)
    .bind(date.to_string())
    .execute(pool)
    .await?;

    let id = done.last_insert_rowid();
    tracing::info!(id, account = %account_id, kind = %record.kind, "transaction stored");
    Ok(id)
}

type TransactionRow = (i64, i64, String, i64, String, String, String, String);

fn transaction_from_row(r: TransactionRow) -> Result<StoredTransaction, StorageError> {
    Ok(StoredTransaction {
        id: r.0,
        account_id: AccountId(r.1),
        record: TransactionRecord {
            kind: r.2.parse()?,
            amount: Amount::from_paise(r.3)?,
            description: r.4,
            category: r.5,
            date: r.6,
        },
        created_at: r.7,
    })
}

/// Matching transactions, oldest first.
pub async fn get_transactions(
    pool: &DbPool,
    filter: &TransactionFilter,
) -> Result<Vec<StoredTransaction>, StorageError> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT id, account_id, type, amount_cents, description, category, transaction_date, created_at FROM transactions WHERE 1 = 1",
    );

    if let Some(account_id) = filter.account_id {
        query.push(" AND account_id = ").push_bind(account_id.0);
    }
    push_range(&mut query, filter.range);
    if let Some(kind) = filter.kind {
        query.push(" AND type = ").push_bind(kind.as_str());
    }
    if let Some(category) = &filter.category {
        query.push(" AND category = ").push_bind(category.clone());
    }
    query.push(" ORDER BY transaction_date ASC, id ASC");

    let rows = query
        .build_query_as::<TransactionRow>()
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(transaction_from_row).collect()
}

fn push_range(query: &mut QueryBuilder<'_, Sqlite>, range: DateRange) {
    if let Some(start) = range.start {
        query.push(" AND transaction_date >= ").push_bind(start.to_string());
    }
    if let Some(end) = range.end {
        query.push(" AND transaction_date <= ").push_bind(end.to_string());
    }
}

/// Returns whether a row was changed. An empty patch touches nothing.
pub async fn update_transaction(
    pool: &DbPool,
    id: i64,
    patch: &TransactionPatch,
) -> Result<bool, StorageError> {
    if patch.is_empty() {
        return Ok(false);
    }

    let mut query = QueryBuilder::<Sqlite>::new("UPDATE transactions SET ");
    let mut fields = query.separated(", ");
    if let Some(kind) = patch.kind {
        fields.push("type = ").push_bind_unseparated(kind.as_str());
    }
    if let Some(amount) = patch.amount {
        fields.push("amount_cents = ").push_bind_unseparated(amount.to_paise()?);
    }
    if let Some(description) = &patch.description {
        fields.push("description = ").push_bind_unseparated(description.clone());
    }
    if let Some(category) = &patch.category {
        fields.push("category = ").push_bind_unseparated(category.clone());
    }
    if let Some(date) = patch.date {
        fields.push("transaction_date = ").push_bind_unseparated(date.to_string());
    }
    query.push(" WHERE id = ").push_bind(id);

    let done = query.build().execute(pool).await?;
    Ok(done.rows_affected() > 0)
}

pub async fn delete_transaction(pool: &DbPool, id: i64) -> Result<bool, StorageError> {
    let done = sqlx::query("DELETE FROM transactions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected() > 0)
}

// ── Summary ──────────────────────────────────────────────────────────────────

pub async fn get_account_summary(
    pool: &DbPool,
    account_id: AccountId,
    range: DateRange,
) -> Result<AccountSummary, StorageError> {
    let mut query = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN type = 'Income' THEN amount_cents ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN type = 'Expense' THEN amount_cents ELSE 0 END), 0),
            COUNT(*)
        FROM transactions
        WHERE account_id = "#,
    );
    query.push_bind(account_id.0);
    push_range(&mut query, range);

    let (income_cents, expense_cents, count) = query
        .build_query_as::<(i64, i64, i64)>()
        .fetch_one(pool)
        .await?;

    let total_income = Decimal::new(income_cents, 2);
    let total_expense = Decimal::new(expense_cents, 2);
    Ok(AccountSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        transaction_count: count,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
