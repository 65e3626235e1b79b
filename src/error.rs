use std::fmt::{self, Display, Formatter};

use crate::{parse, store};

#[derive(Debug)]
pub enum Error {
    Fetch(reqwest::Error),
    Staging(std::io::Error),
    Parse(parse::Error),
    Persistence(store::Error),
    Json(serde_json::Error),
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Fetch(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Staging(e)
    }
}

impl From<parse::Error> for Error {
    fn from(e: parse::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<store::Error> for Error {
    fn from(e: store::Error) -> Self {
        Self::Persistence(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl Error {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Fetch error: {e}"),
            Self::Staging(e) => write!(f, "Staging IO error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Persistence(e) => write!(f, "Persistence error: {e}"),
            Self::Json(e) => write!(f, "Json error: {e}"),
            Self::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
