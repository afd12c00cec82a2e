//! Rule-based reader for sentences like "bought milk for 50 rupees yesterday".
//!
//! Five stages run in a fixed order: amount, type, date, description and
//! category. Each stage lives in its own module and can be called directly.

pub mod amount;
pub mod category;
pub mod clock;
pub mod date;
pub mod description;
pub mod error;
pub mod kind;
pub mod parser;
pub mod patterns;

pub use amount::{AmountSource, ExtractedAmount};
pub use clock::{FixedDate, ReferenceDate, SystemClock};
pub use date::{DateSource, ResolvedDate};
pub use error::{ParseError, PatternError};
pub use parser::TransactionParser;
pub use patterns::{CategoryKeywords, KeywordTables, PatternTables};
