use crate::{Error, Error::*, Result};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// QOP field values understood by the calculator
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Qop {
    /// No qop directive in the challenge (RFC 2069 compatible response)
    Unspecified,
    /// "auth"
    Auth,
}

impl Qop {
    /// Form used in HTTP headers; empty for `Unspecified`
    pub fn as_str(self) -> &'static str {
        match self {
            Qop::Unspecified => "",
            Qop::Auth => "auth",
        }
    }
}

impl Default for Qop {
    fn default() -> Self {
        Qop::Unspecified
    }
}

impl FromStr for Qop {
    type Err = Error;

    /// Parse from "" or "auth"; "auth-int" and anything else is rejected
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Qop::Unspecified),
            "auth" => Ok(Qop::Auth),
            _ => Err(UnsupportedQop(s.into())),
        }
    }
}

impl Display for Qop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
