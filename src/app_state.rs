//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Duration;

use crate::{
    Error,
    auth::{PasswordHash, TokenConfig},
    db::initialize,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The keys and duration for issuing and verifying bearer tokens.
    pub token_config: TokenConfig,

    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `token_secret` is used to sign the bearer tokens, which are valid for `token_duration`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_secret: &str,
        token_duration: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            token_config: TokenConfig::new(token_secret, token_duration),
            password_hash_cost: PasswordHash::DEFAULT_COST,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Use `cost` when hashing new passwords.
    ///
    /// Lower costs make hashing faster, which is useful in tests.
    pub fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = cost;
        self
    }
}
