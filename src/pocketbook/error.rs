use thiserror::Error;

/// A field value was rejected. The record it was meant for is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid phone number '{0}': expected 10-15 digits with an optional leading '+'")]
    InvalidPhone(String),

    #[error("Invalid email address '{0}'")]
    InvalidEmail(String),

    #[error("Address cannot be empty")]
    EmptyAddress,

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    DateFormat(String),

    #[error("Birthday {0} is in the future")]
    FutureDate(String),

    #[error("Invalid tag '{0}': tags must be a single non-empty word")]
    InvalidTag(String),

    #[error("'{0}' is already present")]
    Duplicate(String),
}

/// Failures inside the persistence gateway. These never leave `store`:
/// saves report them as `false`, loads as an absent snapshot.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PocketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("'{0}' already exists")]
    NameTaken(String),

    #[error("'{0}' not found")]
    NotFound(String),

    #[error("Changes were kept in memory but could not be saved to {0}")]
    NotSaved(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, PocketError>;
