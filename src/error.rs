use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `position` is the offending index, or the end of the offending range.
    #[error("position {position} is out of range for a sequence of length {len}")]
    OutOfRange { position: usize, len: usize },
}
