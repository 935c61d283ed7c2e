use thiserror::Error;

/// Failures of a single import attempt. Every variant is terminal for that attempt.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Please select a file to import.")]
    NoFileSelected,

    #[error("File type not allowed: {0}. Please upload CSV or Excel files.")]
    UnsupportedFileType(String),

    #[error("An import is already in progress.")]
    Busy,

    #[error("A submission is in progress. Wait for it to finish before importing.")]
    SubmitInProgress,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Unexpected response format: {0}")]
    FormatError(String),

    #[error("The file contains no data rows.")]
    EmptyImport,

    #[error("Could not read file: {0}")]
    Io(Box<std::io::Error>),
}

impl From<std::io::Error> for ImportError {
    fn from(error: std::io::Error) -> Self {
        ImportError::Io(Box::new(error))
    }
}

/// Failures of a single submit attempt. The form is left populated.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("A submission is already in progress.")]
    Busy,

    #[error("An import is in progress. Wait for it to finish before submitting.")]
    ImportInProgress,

    #[error("{0}")]
    SaveRejected(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Transport-level failure from a collaborator; the request never produced a response.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        TransportError(error.to_string())
    }
}

/// Configuration and start-up errors.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Invalid form definition: {0}")]
    InvalidDefinition(String),
}

impl From<std::io::Error> for FormError {
    fn from(error: std::io::Error) -> Self {
        FormError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for FormError {
    fn from(error: reqwest::Error) -> Self {
        FormError::Reqwest(Box::new(error))
    }
}
