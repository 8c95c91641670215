//! User accounts, passwords and bearer token authentication.

mod log_in;
mod middleware;
mod password;
mod register_user;
mod token;
mod user;
mod users;

pub use log_in::{LogInData, LogInResponse, post_log_in};
pub use middleware::{AuthState, admin_guard, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::register_user;
pub use token::{
    Claims, DEFAULT_TOKEN_DURATION, MAX_TOKEN_DURATION, Token, TokenConfig, decode_token,
    encode_token, token_duration_from_hours,
};
pub use user::{
    NewUser, Role, User, UserID, UserResponse, create_user, create_user_table,
    delete_user, get_all_users, get_user_by_email, get_user_by_id, set_user_role,
    update_password,
};
pub use users::{delete_current_user, delete_user_endpoint, get_current_user, list_users};
