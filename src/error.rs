use std::fmt::{self, Display, Formatter};
use std::result;

/// Boxed error produced by a [`Transport`](crate::Transport)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum Error {
    /// Username or password absent or empty in the target URL
    MissingCredentials,
    /// The challenge asked for a qop other than unspecified or "auth"
    UnsupportedQop(String),
    /// The target could not be parsed or turned into a request
    InvalidUrl(String),
    /// A computed header contained bytes not allowed in an HTTP header
    InvalidHeader(String),
    /// Computing the Authorization header failed during the retry
    Authorization(Box<Error>),
    /// The transport failed to deliver a request
    Transport(BoxError),
}

pub type Result<T> = result::Result<T, Error>;

use Error::*;

impl Error {
    /// Unwrap an `Authorization` wrapper to the calculator error inside
    pub fn root(&self) -> &Error {
        match self {
            Authorization(inner) => inner.root(),
            other => other,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MissingCredentials => f.write_str("Username or password not provided in request URL"),
            UnsupportedQop(qop) => write!(f, "Unsupported QOP directive: '{}'", qop),
            InvalidUrl(ctx) => write!(f, "Invalid request URL: {}", ctx),
            InvalidHeader(ctx) => write!(f, "Invalid header value: {}", ctx),
            Authorization(inner) => write!(f, "Error calculating 'Authorization' header: {}", inner),
            Transport(inner) => Display::fmt(inner, f),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        InvalidUrl(e.to_string())
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        InvalidUrl(e.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Authorization(inner) => Some(inner.as_ref()),
            Transport(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}
