pub mod account;
pub mod amount;
pub mod period;
pub mod transaction;

pub use account::{Account, AccountId, CoreError};
pub use amount::Amount;
pub use period::DateRange;
pub use transaction::{ParsedTransaction, TransactionRecord, TransactionType};
