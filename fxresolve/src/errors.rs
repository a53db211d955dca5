use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    // Errors from external libraries...
    #[error("{0}")]
    FxLib(#[from] fxlib::FxLibError),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    // Errors raised by us...
    #[error("Please specify {0}")]
    MissingArgument(&'static str),
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
