//! Error values.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! Apart from the entropy source failure, which records the message of the
//! underlying error, every variant is a plain marker. Verification never
//! reports these; it simply fails.
use std::fmt;
use std::error::Error as StdError;

/// The short string a crypt-style routine returns in place of a hash.
pub const FAILURE_SENTINEL: &str = "*0";

/// Possible errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The password is longer than the supported maximum.
    PasswordTooLong,
    /// The requested hashing mode has no implementation.
    UnsupportedMode,
    /// Hashing did not produce a complete portable hash.
    HashingFailed,
    /// The settings string is shorter than its fixed prefix.
    SettingTooShort,
    /// The settings string doesn't start with a known identifier.
    UnrecognizedFormat,
    /// The iteration count character is invalid or out of range.
    CorruptIterationField,
    /// The salt is not eight alphabet characters.
    CorruptSalt,
    /// Random value cannot be generated.
    RandomSourceFailure(String),
}

impl Error {
    /// The sentinel value historically returned alongside a failure.
    ///
    /// It is shorter than any valid hash, but callers should rely on the
    /// error itself, not on the length of a returned string.
    pub fn sentinel(&self) -> &'static str {
	FAILURE_SENTINEL
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::PasswordTooLong => write!(f, "Password too long"),
            Error::UnsupportedMode => write!(f, "Hashing mode not supported"),
            Error::HashingFailed => write!(f, "Password hashing failed"),
            Error::SettingTooShort => write!(f, "Setting string is too short"),
            Error::UnrecognizedFormat => write!(f, "Unrecognized hash format"),
            Error::CorruptIterationField => write!(f, "Invalid iteration count"),
            Error::CorruptSalt => write!(f, "Invalid salt"),
            Error::RandomSourceFailure(ref err) => write!(f, "{}", err),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, FAILURE_SENTINEL};

    #[test]
    fn display() {
	assert_eq!(Error::PasswordTooLong.to_string(), "Password too long");
	assert_eq!(Error::RandomSourceFailure("no entropy".into()).to_string(), "no entropy");
    }

    #[test]
    fn sentinel_is_short() {
	assert_eq!(Error::HashingFailed.sentinel(), FAILURE_SENTINEL);
	assert_eq!(FAILURE_SENTINEL.len(), 2);
    }
}
