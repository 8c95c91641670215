#![allow(missing_docs)]

use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState,
    auth::{NewUser, PasswordHash, Role, User, UserID, ValidatedPassword, create_user, encode_token},
};

/// The password every user created by [insert_test_user] logs in with.
pub(crate) const TEST_PASSWORD: &str = "correct horse battery staple";

/// The lowest cost bcrypt accepts, which keeps the tests fast.
pub(crate) const TEST_HASH_COST: u32 = 4;

#[track_caller]
pub(crate) fn insert_test_user(connection: &Connection, email: &str) -> User {
    let password_hash =
        PasswordHash::new(ValidatedPassword::new_unchecked(TEST_PASSWORD), TEST_HASH_COST)
            .expect("Could not hash test password");

    create_user(
        NewUser {
            username: "Test User".to_owned(),
            email: EmailAddress::from_str(email).expect("Invalid test email"),
            password_hash,
            role: Role::User,
        },
        connection,
    )
    .expect("Could not create test user")
}

#[track_caller]
pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::new(connection, "foobarbaz", Duration::minutes(5))
        .expect("Could not create app state")
        .with_password_hash_cost(TEST_HASH_COST)
}

#[track_caller]
pub(crate) fn get_test_token(user_id: UserID, state: &AppState) -> String {
    encode_token(user_id, &state.token_config)
        .expect("Could not create test token")
        .token
}
