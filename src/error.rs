// File: ./src/error.rs
use thiserror::Error;

/// Reasons a pasted job ticket could not be turned into a job.
///
/// Missing secondary fields (address, date, phone, ...) are not errors; they
/// come back as empty strings.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("job text is empty")]
    Empty,

    #[error("no 'IKEA' marker found on the first line")]
    NoAnchor,

    #[error("no customer name found after the 'IKEA' marker")]
    NoName,
}
