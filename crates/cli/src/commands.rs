use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;
use tally_core::{Account, AccountId, Amount, DateRange, ParsedTransaction, TransactionType};
use tally_nlp::{ParseError, ReferenceDate, TransactionParser};
use tally_storage::{DbPool, StoredTransaction, TransactionFilter, TransactionPatch};

/// Shown when a sentence has no amount; the user can fix the input and retry.
const NO_AMOUNT_HINT: &str =
    "Could not find an amount in that sentence. Include a number, e.g. \"spent 50 on milk\".";

fn parse_sentence<C: ReferenceDate>(
    parser: &TransactionParser<C>,
    text: &str,
    on: Option<NaiveDate>,
) -> Result<ParsedTransaction> {
    let parsed = match on {
        Some(date) => parser.parse_with_reference(text, date),
        None => parser.parse(text),
    };
    match parsed {
        Ok(p) => Ok(p),
        Err(ParseError::NoAmountFound) => bail!(NO_AMOUNT_HINT),
    }
}

pub fn render_parsed(p: &ParsedTransaction) -> String {
    format!(
        "Type       : {}\nAmount     : {}\nDescription: {}\nCategory   : {}\nDate       : {}",
        p.kind(),
        p.amount(),
        p.description(),
        p.category().unwrap_or("-"),
        p.date(),
    )
}

pub fn parse<C: ReferenceDate>(
    parser: &TransactionParser<C>,
    text: &str,
    on: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let parsed = parse_sentence(parser, text, on)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.to_record())?);
    } else {
        println!("{}", render_parsed(&parsed));
    }
    Ok(())
}

// ── Accounts ─────────────────────────────────────────────────────────────────

async fn require_account(db: &DbPool, name: &str) -> Result<AccountId> {
    let account = tally_storage::get_account_by_name(db, name)
        .await?
        .with_context(|| {
            format!("Account not found: {name} (create it with `tally account add`)")
        })?;
    account
        .id
        .with_context(|| format!("Account {name} has no id"))
}

pub async fn account_add(db: &DbPool, name: &str, description: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Account name required.");
    }
    let account = Account::new(name, description.trim());
    match tally_storage::add_account(db, &account).await? {
        Some(id) => println!("Created account {name} (#{id})"),
        None => bail!("Account name already exists: {name}"),
    }
    Ok(())
}

pub fn render_accounts(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found. Create one with `tally account add <NAME>`.".to_string();
    }
    accounts
        .iter()
        .map(|a| {
            let id = a.id.map(|i| i.to_string()).unwrap_or_default();
            if a.description.is_empty() {
                format!("#{id:<4} {}", a.name)
            } else {
                format!("#{id:<4} {} ({})", a.name, a.description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn account_list(db: &DbPool) -> Result<()> {
    let accounts = tally_storage::get_all_accounts(db).await?;
    println!("{}", render_accounts(&accounts));
    Ok(())
}

pub async fn account_delete(db: &DbPool, name: &str) -> Result<()> {
    let id = require_account(db, name).await?;
    tally_storage::delete_account(db, id).await?;
    println!("Deleted account {name} and its transactions");
    Ok(())
}

// ── Transactions ─────────────────────────────────────────────────────────────

pub async fn add<C: ReferenceDate>(
    db: &DbPool,
    parser: &TransactionParser<C>,
    account: &str,
    text: &str,
    on: Option<NaiveDate>,
) -> Result<()> {
    let account_id = require_account(db, account).await?;
    let parsed = parse_sentence(parser, text, on)?;
    let id = tally_storage::add_transaction(db, account_id, &parsed.to_record()).await?;
    println!(
        "Added #{id}: {} {} {} ({}) on {}",
        parsed.kind(),
        parsed.amount(),
        parsed.description(),
        parsed.category().unwrap_or("Uncategorized"),
        parsed.date(),
    );
    Ok(())
}

/// Replacement values for `tally edit`; unset fields keep their stored value.
#[derive(Debug, Default)]
pub struct EditArgs {
    pub kind: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EditArgs {
    fn into_patch(self) -> Result<TransactionPatch> {
        let amount = self.amount.map(Amount::new).transpose()?;
        let description = match self.description.map(|d| d.trim().to_string()) {
            Some(d) if d.is_empty() => bail!("Description cannot be empty."),
            other => other,
        };
        Ok(TransactionPatch {
            kind: self.kind,
            amount,
            description,
            category: self.category.map(|c| c.trim().to_string()),
            date: self.date,
        })
    }
}

pub async fn edit(db: &DbPool, id: i64, args: EditArgs) -> Result<()> {
    let patch = args.into_patch()?;
    if patch.is_empty() {
        bail!(
            "Nothing to change. Pass at least one of \
             --type, --amount, --description, --category, --date."
        );
    }
    if !tally_storage::update_transaction(db, id, &patch).await? {
        bail!("Transaction not found: #{id}");
    }
    println!("Updated transaction #{id}");
    Ok(())
}

pub async fn delete(db: &DbPool, id: i64) -> Result<()> {
    if !tally_storage::delete_transaction(db, id).await? {
        bail!("Transaction not found: #{id}");
    }
    println!("Deleted transaction #{id}");
    Ok(())
}

#[derive(Debug, Default)]
pub struct ListArgs {
    pub account: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
}

async fn build_filter(db: &DbPool, args: ListArgs) -> Result<TransactionFilter> {
    let account_id = match &args.account {
        Some(name) => Some(require_account(db, name).await?),
        None => None,
    };
    Ok(TransactionFilter {
        account_id,
        range: DateRange::open(args.from, args.to),
        kind: args.kind,
        category: args.category,
    })
}

pub fn render_transactions(rows: &[StoredTransaction]) -> String {
    if rows.is_empty() {
        return "No transactions found.".to_string();
    }
    rows.iter()
        .map(|t| {
            let r = &t.record;
            format!(
                "#{:<4} {} {:<7} {:>12} {:<14} {}",
                t.id,
                r.date,
                r.kind,
                r.amount.to_string(),
                r.category().unwrap_or("Uncategorized"),
                r.description,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn list(db: &DbPool, args: ListArgs) -> Result<()> {
    let filter = build_filter(db, args).await?;
    let rows = tally_storage::get_transactions(db, &filter).await?;
    println!("{}", render_transactions(&rows));
    Ok(())
}

pub async fn summary(
    db: &DbPool,
    account: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let id = require_account(db, account).await?;
    let range = DateRange::open(from, to);
    let s = tally_storage::get_account_summary(db, id, range).await?;
    println!("{account} ({range})");
    println!("  Income      : ₹{:.2}", s.total_income);
    println!("  Expense     : ₹{:.2}", s.total_expense);
    println!("  Balance     : ₹{:.2}", s.balance);
    println!("  Transactions: {}", s.transaction_count);
    Ok(())
}

// ── Export ───────────────────────────────────────────────────────────────────

pub fn write_csv<W: Write>(out: W, rows: &[StoredTransaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["id", "account_id", "type", "amount", "description", "category", "date"])?;
    for t in rows {
        let r = &t.record;
        wtr.write_record([
            t.id.to_string(),
            t.account_id.to_string(),
            r.kind.to_string(),
            r.amount.value().to_string(),
            r.description.clone(),
            r.category().unwrap_or("Uncategorized").to_string(),
            r.date.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub async fn export(db: &DbPool, args: ListArgs, output: Option<&Path>) -> Result<()> {
    let filter = build_filter(db, args).await?;
    let rows = tally_storage::get_transactions(db, &filter).await?;
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("create {}", path.display()))?;
            write_csv(file, &rows)?;
            eprintln!("Exported {} transactions to {}", rows.len(), path.display());
        }
        None => write_csv(std::io::stdout().lock(), &rows)?,
    }
    Ok(())
}
