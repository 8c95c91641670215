//! Creating and verifying the JSON Web Tokens used for authentication.

use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// How long a token is valid for if no duration is configured.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(24);

/// The longest a token may be valid for.
pub const MAX_TOKEN_DURATION: Duration = Duration::days(365);

/// Convert a configured number of hours into a token duration.
///
/// # Errors
///
/// Returns [Error::InvalidTokenDuration] unless `hours` is at least one and
/// at most [MAX_TOKEN_DURATION].
pub fn token_duration_from_hours(hours: i64) -> Result<Duration, Error> {
    if hours < 1 || hours > MAX_TOKEN_DURATION.whole_hours() {
        return Err(Error::InvalidTokenDuration(hours));
    }

    Ok(Duration::hours(hours))
}

/// The keys and duration used to issue and verify tokens.
#[derive(Clone)]
pub struct TokenConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// How long an issued token is valid for.
    pub token_duration: Duration,
}

impl TokenConfig {
    /// Create the signing keys from a `secret` string.
    pub fn new(secret: &str, token_duration: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_duration,
        }
    }
}

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserID,
    /// The time the token was issued as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: i64,
}

/// A signed token and the time it stops being valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Issue a token for `user_id` that expires after the configured duration.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if the claims could not be signed.
pub fn encode_token(user_id: UserID, config: &TokenConfig) -> Result<Token, Error> {
    let now = OffsetDateTime::now_utc();
    let expires_at = now
        .checked_add(config.token_duration)
        .ok_or_else(|| Error::TokenCreation("token expiry is out of range".to_owned()))?;

    let claims = Claims {
        sub: user_id,
        iat: now.unix_timestamp(),
        exp: expires_at.unix_timestamp(),
    };

    let token = encode(&Header::default(), &claims, &config.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))?;

    Ok(Token { token, expires_at })
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
///
/// Returns [Error::TokenExpired] if the token has expired, otherwise
/// [Error::InvalidToken] if the token could not be verified.
pub fn decode_token(token: &str, config: &TokenConfig) -> Result<Claims, Error> {
    decode::<Claims>(token, &config.decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => Error::TokenExpired,
            _ => Error::InvalidToken,
        })
}
