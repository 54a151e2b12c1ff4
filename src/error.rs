use thiserror::Error;

/// Every way an invocation against the registry can fail.
///
/// The first seven variants are what a caller can provoke. The `#[from]`
/// variants wrap failures on the host side: reading invocation files,
/// writing responses, encoding records, opening storage.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Malformed or missing input, wrong argument count, bad JSON.
    #[error("{0}")]
    ValidationError(String),
    /// Duplicate loan UID on issuance, or a status change from the wrong state.
    #[error("{0}")]
    ConflictError(String),
    /// The caller's organisation may not perform the attempted transition.
    #[error("{0}")]
    AuthorizationError(String),
    /// No record under the loan UID in the requested collection.
    #[error("Loan does not exist: {0}")]
    NotFoundError(String),
    /// The underlying record store failed or refused the access.
    #[error("{0}")]
    StoreError(String),
    #[error("Impossible to get the transaction creator's organisation MSP identity")]
    IdentityError,
    #[error("Received unknown function invocation")]
    UnknownFunction(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
