//! Portable PHPass password hashing and verification.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! The portable hash is the scheme PHPass falls back to when nothing
//! stronger is available, and the one WordPress, phpBB3 and many other PHP
//! applications store by default: salted MD5, iterated a power-of-two number
//! of times, written as a 34-character string such as
//! `$P$BF6mA2JZNjAWGhOm9E5o337tcwr9vm.`. It is weak by modern standards and
//! is provided for compatibility with existing password databases.
//!
//! # Getting Started
//!
//! Add the following to the `[dependencies]` section of your `Cargo.toml`:
//!
//! ```toml
//! phpass = "0.1"
//! ```
//!
//! # Examples
//!
//! To hash and verify a password with a configured hasher:
//!
//! ```
//! use phpass::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(8, true);
//! let h = hasher.hash_password("password").unwrap();
//! assert_eq!(h.len(), 34);
//! assert!(hasher.check_password("password", &h));
//! ```
//!
//! To verify a hash produced elsewhere, including phpBB3's `$H$` variant:
//!
//! ```
//! use phpass::portable;
//!
//! assert!(portable::verify("test12345", "$P$9IQRaTwmfeRo7ud9Fh4E2PdI0S3r.L0"));
//! assert!(portable::verify("pass1234", "$H$9/O41.qQjQNlleivjbckbSNpfS4xgh0"));
//! ```
//!
//! # Layout
//!
//! * [hasher](hasher) holds the [`PasswordHasher`](hasher::PasswordHasher)
//!   facade and its validated configuration.
//!
//! * [portable](portable) implements the iterated digest and offers
//!   `hash`, `hash_with`, `verify` and a __crypt__(3)-like `crypt`.
//!
//! * [setting](setting) generates and parses the 12-character settings
//!   prefix.
//!
//! The Blowfish and extended-DES settings that PHPass can also produce are
//! not supported.

#![warn(missing_docs)]

mod enc_dec;
pub mod error;
pub mod setting;
pub mod portable;
pub mod hasher;

pub use crate::hasher::{HashMode, HasherConfig, IterationCountLog2, PasswordHasher};
pub use crate::setting::Setting;

/// Type alias for the Result type.
pub type Result<T> = std::result::Result<T, error::Error>;

/// Setup struct for basic hashing customization.
///
/// If `salt` is set to `None`, a random salt will be generated; a custom salt
/// must be eight characters of the hash alphabet. `rounds` is the base-2
/// logarithm of the number of rounds as stored in the hash, between 7 and 30;
/// `None` selects the default of 13.
pub struct HashSetup<'a> {
    /// Custom salt.
    pub salt: Option<&'a str>,
    /// Stored round exponent.
    pub rounds: Option<u32>,
}

/// A trait for converting a type into a validated `Setting`.
pub trait IntoSetting {
    /// The conversion function.
    fn into_setting(self) -> Result<Setting>;
}

impl IntoSetting for &str {
    fn into_setting(self) -> Result<Setting> {
	Setting::parse(self)
    }
}

impl IntoSetting for &String {
    fn into_setting(self) -> Result<Setting> {
	Setting::parse(self)
    }
}

impl IntoSetting for HashSetup<'_> {
    fn into_setting(self) -> Result<Setting> {
	let rounds = self.rounds.unwrap_or(portable::DEFAULT_COUNT_LOG2);
	match self.salt {
	    Some(salt) => Setting::portable(salt, rounds),
	    None => Setting::portable(&random::gen_salt_str()?, rounds),
	}
    }
}

impl IntoSetting for Setting {
    fn into_setting(self) -> Result<Setting> {
	Ok(self)
    }
}

fn consteq(hash: &str, calchash: Result<String>) -> bool {
    let hstr = match calchash {
	Ok(hstr) => hstr,
	Err(_) => return false,
    };
    if hash.len() != hstr.len() {
	return false;
    }
    0 == hash.bytes().zip(hstr.bytes()).fold(0, |xs, (h1, h2)| xs | h1 ^ h2)
}

mod random {
    use rand::RngCore;
    use rand::rngs::OsRng;
    use super::Result;
    use crate::error::Error;
    use crate::enc_dec::hash64_encode;
    use crate::setting::SALT_SEED_LEN;

    pub fn gen_salt_bytes(bytes: &mut [u8]) -> Result<()> {
	OsRng.try_fill_bytes(bytes).map_err(|e| {
	    #[cfg(feature = "tracing")]
	    tracing::debug!("entropy source failed: {}", e);
	    Error::RandomSourceFailure(e.to_string())
	})
    }

    pub fn gen_salt_str() -> Result<String> {
	let mut seed = [0u8; SALT_SEED_LEN];
	gen_salt_bytes(&mut seed)?;
	Ok(hash64_encode(&seed))
    }
}

mod parse {
    use std::str;

    /// A trait for traversing a hash string.
    ///
    /// Hash strings have internal structure: they consist of a concatenation
    /// of a number of substrings. This trait enables extracting references to
    /// those substrings with the necessary semantics.
    pub trait HashIterator {
	/// The substring that is returned by methods.
	type Elem;

	/// Extract a fixed-size substring.
	///
	/// There must be <i>at least</i> `n` bytes remaining in the string, and
	/// the substring must fall on character boundaries. Otherwise, `None` is
	/// returned, and the string is drained.
	fn take(&mut self, n: usize) -> Option<Self::Elem>;
    }

    pub struct HashSlice<'a> {
	bp: &'a [u8],
	len: usize,
	pos: usize,
    }

    impl<'a> HashSlice<'a> {
	pub fn new(hash: &'a str) -> HashSlice<'a> {
	    HashSlice { bp: hash.as_bytes(), len: hash.len(), pos: 0 }
	}
    }

    impl<'a> HashIterator for HashSlice<'a> {
	type Elem = &'a str;

	fn take(&mut self, n: usize) -> Option<Self::Elem> {
	    let sp = self.pos;
	    if sp + n > self.len {
		self.pos = self.len;
		return None;
	    }
	    self.pos = sp + n;
	    match str::from_utf8(&self.bp[sp..self.pos]) {
		Ok(s) => Some(s),
		Err(_) => {
		    self.pos = self.len;
		    None
		}
	    }
	}
    }

    #[cfg(test)]
    mod tests {
	use super::{HashSlice, HashIterator};

	#[test]
	fn drain_string() {
	    let mut hs = HashSlice::new("$P$BF6mA2JZNjAWGhOm9E5o337tcwr9vm.");
	    assert_eq!(hs.take(3).unwrap(), "$P$");
	    assert_eq!(hs.take(1).unwrap(), "B");
	    assert_eq!(hs.take(8).unwrap(), "F6mA2JZN");
	    assert_eq!(hs.take(22).unwrap(), "jAWGhOm9E5o337tcwr9vm.");
	    assert_eq!(hs.take(1), None);
	    assert_eq!(hs.take(0).unwrap(), "");
	}

	#[test]
	fn short_string() {
	    let mut hs = HashSlice::new("$P$");
	    assert_eq!(hs.take(4), None);
	    assert_eq!(hs.take(1), None);
	}

	#[test]
	fn split_character() {
	    let mut hs = HashSlice::new("$é$");
	    assert_eq!(hs.take(1).unwrap(), "$");
	    assert_eq!(hs.take(1), None);
	    assert_eq!(hs.take(1), None);
	}
    }
}
