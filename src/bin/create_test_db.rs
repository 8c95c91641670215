use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Month};

use finance_manager::{
    CategoryKind, CategoryName, NewBudget, NewExpense, NewIncome, NewUser, PasswordHash, Period,
    Role, UserID, ValidatedPassword, create_budget, create_category, create_expense,
    create_income, create_user, initialize_db,
};

/// A utility for creating a test database for the finance manager REST API server.
///
/// The database has an administrator `admin@example.com` and a regular user
/// `user@example.com`, both with the password "test". The regular user has
/// a few months of expenses, incomes and budgets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test users...");
    insert_user(&conn, "Admin", "admin@example.com", Role::Admin)?;
    let user_id = insert_user(&conn, "Test User", "user@example.com", Role::User)?;

    println!("Creating categories...");
    for (name, kind) in [
        ("Groceries", CategoryKind::Expense),
        ("Rent", CategoryKind::Expense),
        ("Transport", CategoryKind::Expense),
        ("Salary", CategoryKind::Income),
    ] {
        create_category(CategoryName::new(name)?, kind, user_id, &conn)?;
    }

    println!("Creating expenses, incomes and budgets...");
    for month in [Month::January, Month::February, Month::March] {
        let period = Period::new(2024, month);

        for (day, category, amount, destination) in [
            (3, "Rent", Decimal::new(1_500_00, 2), "Landlord"),
            (7, "Groceries", Decimal::new(123_45, 2), "Supermarket"),
            (14, "Transport", Decimal::new(45_00, 2), "Metro card"),
            (21, "Groceries", Decimal::new(98_10, 2), "Supermarket"),
        ] {
            create_expense(
                NewExpense {
                    date: Date::from_calendar_date(2024, month, day)?,
                    category: CategoryName::new(category)?,
                    amount,
                    destination: Some(destination.to_owned()),
                    notes: None,
                },
                user_id,
                &conn,
            )?;
        }

        create_income(
            NewIncome {
                date: Date::from_calendar_date(2024, month, 25)?,
                category: CategoryName::new("Salary")?,
                amount: Decimal::new(4_200_00, 2),
                source: Some("Employer".to_owned()),
                notes: None,
            },
            user_id,
            &conn,
        )?;

        for (category, limit) in [
            ("Groceries", Decimal::new(300, 0)),
            ("Transport", Decimal::new(60, 0)),
        ] {
            create_budget(
                NewBudget {
                    category: CategoryName::new(category)?,
                    limit,
                    period,
                },
                user_id,
                &conn,
            )?;
        }
    }

    println!("Success!");

    Ok(())
}

fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    role: Role,
) -> Result<UserID, Box<dyn Error>> {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = create_user(
        NewUser {
            username: username.to_owned(),
            email: EmailAddress::from_str(email)?,
            password_hash,
            role,
        },
        conn,
    )?;

    Ok(user.id)
}
