use thiserror::Error;
use welp_core::ValidationError;
use welp_directory::DirectoryError;

/// Why a search did not produce a rendered result set.
///
/// The `Display` text of the user-facing variants is what the front end shows.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("No restaurants found: we couldn't find a city called \"{0}\".")]
    CityNotFound(String),

    #[error("No restaurants found: the restaurant directory is unavailable ({0}).")]
    Directory(#[from] DirectoryError),

    /// A newer search started before this one settled; its results were discarded.
    #[error("search {generation} was superseded by search {current}")]
    Superseded { generation: u64, current: u64 },
}

/// Why the device could not report its position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid history owner key \"{0}\"")]
    InvalidOwnerKey(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("no account exists for this email")]
    UserNotFound,

    #[error("Incorrect password.")]
    WrongPassword,

    #[error("An account already exists for this email.")]
    EmailInUse,

    #[error("account store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("account store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("no result at index {index} (result set has {len})")]
    UnknownIndex { index: usize, len: usize },
}
