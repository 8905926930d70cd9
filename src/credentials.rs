use crate::{Error, Result};
use percent_encoding::percent_decode_str;
use std::fmt;
use url::Url;

/// Login credentials taken from the userinfo part of the target URL
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Extract `user:password` from the URL authority, percent-decoded.
    ///
    /// # Errors
    /// `MissingCredentials` if either part is absent or empty, `InvalidUrl` if a part
    /// does not decode to UTF-8
    pub fn from_url(url: &Url) -> Result<Self> {
        let username = decode(url.username())?;
        let password = decode(url.password().unwrap_or(""))?;

        let credentials = Self { username, password };
        if credentials.is_complete() {
            Ok(credentials)
        } else {
            Err(Error::MissingCredentials)
        }
    }

    /// Both the username and the password are non-empty
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

fn decode(s: &str) -> Result<String> {
    percent_decode_str(s)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::InvalidUrl("credentials are not valid UTF-8 once decoded".into()))
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
