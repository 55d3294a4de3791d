use serde::{Deserialize, Serialize};

/// Accounts created when no credential file exists yet.
/// These passwords are public knowledge; change or remove them after first start.
pub const DEFAULT_ACCOUNTS: [(&str, &str); 2] = [("admin", "admin123"), ("user", "user123")];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
}

/// Registration input problems. Messages are shown to the user verbatim.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Username already exists.")]
    UsernameTaken,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}
