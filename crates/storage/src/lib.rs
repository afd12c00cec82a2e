pub mod db;

pub use db::{
    add_account, add_transaction, create_db, delete_account, delete_transaction,
    get_account_by_name, get_account_summary, get_all_accounts, get_transactions,
    update_transaction, AccountSummary, DbPool, StorageError, StoredTransaction,
    TransactionFilter, TransactionPatch,
};
