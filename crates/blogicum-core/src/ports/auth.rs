//! Authentication ports.

/// Claims stored in session tokens.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: i64,
    pub username: String,
    pub exp: i64,
}

/// Token service trait for signed session tokens.
pub trait TokenService: Send + Sync {
    /// Generate a session token for a user.
    fn generate_token(&self, user_id: i64, username: &str) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing session")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
