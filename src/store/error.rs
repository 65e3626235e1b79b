use std::fmt::{self, Display, Formatter};

use firestore::errors::FirestoreError;

#[derive(Debug)]
pub enum Error {
    Firestore(FirestoreError),
    Http(reqwest::Error),
    Status { status: u16, body: String },
    Url(url::ParseError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<FirestoreError> for Error {
    fn from(e: FirestoreError) -> Self {
        Self::Firestore(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Firestore(e) => write!(f, "Firestore error: {e}"),
            Self::Http(e) => write!(f, "Request error: {e}"),
            Self::Status { status, body } => write!(f, "Backend answered {status}: {body}"),
            Self::Url(e) => write!(f, "Invalid backend url: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Json(e) => write!(f, "Json error: {e}"),
        }
    }
}

impl std::error::Error for Error {}
