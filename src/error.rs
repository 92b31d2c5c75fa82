use std::fmt;

use crate::resolver::ErrorCode;

#[derive(Debug)]
pub enum PickError {
    InvalidArguments(String),
    NoSuitableParams(ErrorCode),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::InvalidArguments(msg) => write!(f, "{msg}"),
            PickError::NoSuitableParams(code) => write!(f, "{code}"),
        }
    }
}

impl std::error::Error for PickError {}
