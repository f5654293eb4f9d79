//! Errors that can occur when decoding wire data.

use thiserror::Error;

/// Error returned when reading or decoding a wire element.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("end of buffer")]
    EndOfBuffer,
    #[error("extra data: {0} bytes")]
    ExtraData(usize),
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("invalid {0}: {1}")]
    Invalid(&'static str, &'static str),
}
