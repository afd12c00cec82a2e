use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tally_core::TransactionType;
use tally_nlp::TransactionParser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{EditArgs, ListArgs};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Record income and expenses by writing plain sentences")]
struct Cli {
    /// Path to config.toml (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a sentence and print the structured transaction without saving it
    Parse {
        /// e.g. "bought milk for 50 rupees yesterday"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Treat this day as "today" (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage accounts
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// Parse a sentence and store it in an account
    Add {
        /// Account name
        #[arg(long, short)]
        account: String,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Treat this day as "today" (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Change fields of a stored transaction
    Edit {
        /// Transaction id, as shown by `tally list`
        id: i64,

        /// Income or Expense
        #[arg(long = "type")]
        kind: Option<TransactionType>,

        #[arg(long)]
        amount: Option<Decimal>,

        #[arg(long)]
        description: Option<String>,

        /// Pass "" to clear
        #[arg(long)]
        category: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete a stored transaction
    Delete {
        /// Transaction id, as shown by `tally list`
        id: i64,
    },

    /// List stored transactions
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Income, expense and balance for one account
    Summary {
        #[arg(long, short)]
        account: String,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Write transactions as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Create an account
    Add {
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Show all accounts
    List,

    /// Delete an account and all of its transactions
    Delete { name: String },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    #[arg(long, short)]
    account: Option<String>,

    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Income or Expense
    #[arg(long = "type")]
    kind: Option<TransactionType>,

    #[arg(long)]
    category: Option<String>,
}

impl From<FilterArgs> for ListArgs {
    fn from(f: FilterArgs) -> Self {
        ListArgs {
            account: f.account,
            from: f.from,
            to: f.to,
            kind: f.kind,
            category: f.category,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config(cli.config.as_deref())?;
    let parser = TransactionParser::with_tables(cfg.pattern_tables()?);

    if let Command::Parse { text, date, json } = &cli.command {
        return commands::parse(&parser, &text.join(" "), *date, *json);
    }

    let db_path = cfg.database_path()?;
    tracing::info!(path = %db_path.display(), "opening database");
    let db = tally_storage::create_db(&db_path).await?;

    match cli.command {
        Command::Parse { .. } => Ok(()),
        Command::Account { command } => match command {
            AccountCommand::Add { name, description } => {
                commands::account_add(&db, &name, &description).await
            }
            AccountCommand::List => commands::account_list(&db).await,
            AccountCommand::Delete { name } => commands::account_delete(&db, &name).await,
        },
        Command::Add { account, text, date } => {
            commands::add(&db, &parser, &account, &text.join(" "), date).await
        }
        Command::Edit {
            id,
            kind,
            amount,
            description,
            category,
            date,
        } => {
            let args = EditArgs {
                kind,
                amount,
                description,
                category,
                date,
            };
            commands::edit(&db, id, args).await
        }
        Command::Delete { id } => commands::delete(&db, id).await,
        Command::List { filter } => commands::list(&db, filter.into()).await,
        Command::Summary { account, from, to } => {
            commands::summary(&db, &account, from, to).await
        }
        Command::Export { filter, output } => {
            commands::export(&db, filter.into(), output.as_deref()).await
        }
    }
}
