use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use finance_tracker::{
    Budget, BudgetMonth, BudgetStore, CategoryStore, SQLiteStore, Transaction, TransactionStore,
    TransactionType, predefined_categories,
};

/// A utility for creating a demo database for the REST API server of finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Expenses as (days before today, amount, description, category).
const DEMO_EXPENSES: [(i64, f64, &str, &str); 10] = [
    (0, 450.0, "Groceries", "Food & Dining"),
    (1, 120.0, "Metro card top up", "Transportation"),
    (3, 1800.0, "Electricity bill", "Bills & Utilities"),
    (5, 650.0, "Dinner with friends", "Food & Dining"),
    (8, 2400.0, "New shoes", "Shopping"),
    (12, 399.0, "Streaming subscription", "Entertainment"),
    (20, 900.0, "Pharmacy", "Healthcare"),
    (33, 5200.0, "Weekend trip", "Travel"),
    (38, 700.0, "Groceries", "Food & Dining"),
    (45, 1500.0, "Online course", "Education"),
];

/// Budgets for the current month as (category, amount).
const DEMO_BUDGETS: [(&str, f64); 4] = [
    ("Food & Dining", 1500.0),
    ("Shopping", 2000.0),
    ("Bills & Utilities", 2500.0),
    ("Entertainment", 500.0),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'finance.sqlite3').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = SQLiteStore::new(Connection::open(output_path)?)?;

    println!("Creating categories...");
    store.initialize_categories(&predefined_categories())?;

    let today = OffsetDateTime::now_utc().date();
    seed_transactions(&store, today)?;
    seed_budgets(&store, today)?;

    println!("Success!");

    Ok(())
}

fn seed_transactions(store: &SQLiteStore, today: Date) -> Result<(), Box<dyn Error>> {
    println!("Creating transactions...");

    let first_of_month = today.replace_day(1)?;
    let first_of_last_month = (first_of_month - Duration::days(1)).replace_day(1)?;

    for date in [first_of_last_month, first_of_month] {
        store.create_transaction(
            Transaction::build(65000.0, date, "Monthly salary", "Salary")
                .kind(TransactionType::Income),
        )?;
    }

    for (days_ago, amount, description, category) in DEMO_EXPENSES {
        let date = today - Duration::days(days_ago);
        store.create_transaction(Transaction::build(amount, date, description, category))?;
    }

    Ok(())
}

fn seed_budgets(store: &SQLiteStore, today: Date) -> Result<(), Box<dyn Error>> {
    println!("Creating budgets...");

    let month = BudgetMonth::from(today.month());

    for (category, amount) in DEMO_BUDGETS {
        store.create_budget(Budget::build(category, amount, month, today.year()))?;
    }

    Ok(())
}
