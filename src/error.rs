use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("bad encryption key size")]
    BadKeySize,

    #[error("message size is incompatible with encryption type")]
    BadMessageSize,

    #[error("ASN.1 value overruns end of buffer")]
    Overrun,

    #[error("ASN.1 encoding is missing a required field")]
    MissingField,

    #[error("ASN.1 character string is not valid UTF-8")]
    BadFormat,

    #[error("out of memory")]
    OutOfMemory,

    #[error("internal crypto error")]
    Internal,

    #[error("type '{0}' is already registered")]
    TypeExists(String),

    #[error("type '{0}' not found")]
    TypeNotFound(String),
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}
