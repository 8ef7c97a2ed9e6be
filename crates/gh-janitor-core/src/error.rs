use thiserror::Error;

/// Errors turning text into an [`IssueRef`](crate::IssueRef)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueRefError {
    #[error("{0:?} is not of the form repo#number")]
    Malformed(String),

    #[error("Can't parse issue number {number:?} from {input:?}")]
    InvalidNumber { input: String, number: String },
}

/// Errors reading a column id out of a "Copy column link" URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnUrlError {
    #[error("Invalid input column URL {0:?}: no '-' before the column id")]
    MissingId(String),

    #[error("Invalid input column URL {url:?}: {id:?} is not a column id")]
    InvalidId { url: String, id: String },
}
