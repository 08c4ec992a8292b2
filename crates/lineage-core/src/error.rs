//! Error types for record normalization.

use crate::record::Field;
use thiserror::Error;

/// Why a raw row could not be turned into a [`Triple`](crate::Triple).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// None of the accepted column names for this field are present.
    #[error("missing {field} column (expected one of: {})", .field.aliases().join(", "))]
    MissingField { field: Field },

    /// The column exists but every accepted spelling holds a blank value.
    #[error("blank {field} value")]
    InvalidRecord { field: Field },
}

impl RecordError {
    /// The field that failed.
    pub fn field(&self) -> Field {
        match self {
            Self::MissingField { field } | Self::InvalidRecord { field } => *field,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
