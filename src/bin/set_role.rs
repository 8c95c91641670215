use std::{error::Error, path::Path, process::exit};

use clap::{Parser, ValueEnum};
use rusqlite::Connection;

use finance_manager::{Role, get_user_by_email, set_user_role};

/// A utility for promoting a user to administrator or demoting them to a regular user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email address of the user to change.
    #[arg(long)]
    email: String,

    /// The new role for the user.
    #[arg(long, value_enum)]
    role: RoleArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    if !db_path.is_file() {
        eprintln!("File does not exist at {db_path:#?}!");
        exit(1);
    }

    let conn = Connection::open(db_path)?;
    let user = match get_user_by_email(&args.email, &conn) {
        Ok(user) => user,
        Err(error) => {
            eprintln!("Could not find the user {}: {error}", args.email);
            exit(1);
        }
    };

    let role = Role::from(args.role);
    set_user_role(user.id, role, &conn)?;
    println!("{} is now {role:?}", user.email);

    Ok(())
}
