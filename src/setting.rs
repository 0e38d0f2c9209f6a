//! Settings strings: generation and parsing.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! A settings string is the fixed 12-character head of every portable hash:
//!
//! * a three-character identifier, __`$P$`__ or __`$H$`__ (the latter
//!   written by phpBB3; both hash identically);
//!
//! * one character whose alphabet index is the base-2 logarithm of the
//!   number of rounds;
//!
//! * eight characters of salt, produced by encoding six random bytes.

use std::cmp::min;
use std::fmt;
use super::Result;
use crate::error::Error;
use crate::enc_dec::{decode_index, hash64_encode, is_hash64, ITOA64};
use crate::parse::{self, HashIterator};

/// Identifier written by the portable generator.
pub const PORTABLE_MAGIC: &str = "$P$";
/// Identifier used by phpBB3 for the same scheme.
pub const PHPBB_MAGIC: &str = "$H$";
/// Length of the settings prefix.
pub const SETTING_LEN: usize = 12;
/// Length of the encoded salt.
pub const SALT_LEN: usize = 8;
/// Number of random bytes encoded into the salt.
pub const SALT_SEED_LEN: usize = 6;

const MAGIC_LEN: usize = 3;
// phpass under PHP 5 stores the configured log2 plus five, so a configured
// range of [4,31] lands on '7'..'S' once capped.
const COUNT_LOG2_OFFSET: u32 = 5;
/// Smallest round exponent accepted in a settings string.
pub const MIN_COUNT_LOG2: u32 = 7;
/// Largest round exponent accepted in a settings string.
pub const MAX_COUNT_LOG2: u32 = 30;

/// Build a portable settings string from six salt bytes.
///
/// The stored exponent is `iteration_count_log2 + 5`, capped at 30.
pub fn gen_portable(seed: &[u8; SALT_SEED_LEN], iteration_count_log2: u32) -> String {
    let count_log2 = min(iteration_count_log2.saturating_add(COUNT_LOG2_OFFSET), MAX_COUNT_LOG2);
    let mut out = String::with_capacity(SETTING_LEN);
    out.push_str(PORTABLE_MAGIC);
    out.push(ITOA64[count_log2 as usize] as char);
    out.push_str(&hash64_encode(seed));
    out
}

/// A validated settings prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    magic: &'static str,
    count_log2: u32,
    salt: String,
}

impl Setting {
    /// Parse the first twelve characters of a settings or hash string.
    ///
    /// Anything past the prefix is ignored. The salt is taken as-is, so
    /// hashes written by other implementations with unusual salts still
    /// verify.
    pub fn parse(setting: &str) -> Result<Setting> {
	if setting.len() < SETTING_LEN {
	    return Err(Error::SettingTooShort);
	}
	let mut hs = parse::HashSlice::new(setting);
	let magic = match hs.take(MAGIC_LEN) {
	    Some(PORTABLE_MAGIC) => PORTABLE_MAGIC,
	    Some(PHPBB_MAGIC) => PHPBB_MAGIC,
	    _ => return Err(Error::UnrecognizedFormat),
	};
	let count_log2 = hs.take(1)
	    .and_then(|c| c.chars().next())
	    .and_then(decode_index)
	    .ok_or(Error::CorruptIterationField)?;
	if count_log2 < MIN_COUNT_LOG2 || count_log2 > MAX_COUNT_LOG2 {
	    return Err(Error::CorruptIterationField);
	}
	let salt = hs.take(SALT_LEN).ok_or(Error::CorruptSalt)?;
	Ok(Setting { magic, count_log2, salt: salt.to_owned() })
    }

    /// Assemble a portable setting from an encoded salt and a round exponent.
    ///
    /// Unlike parsing, the salt must consist of alphabet characters.
    pub fn portable(salt: &str, count_log2: u32) -> Result<Setting> {
	if count_log2 < MIN_COUNT_LOG2 || count_log2 > MAX_COUNT_LOG2 {
	    return Err(Error::CorruptIterationField);
	}
	if salt.len() != SALT_LEN || !is_hash64(salt) {
	    return Err(Error::CorruptSalt);
	}
	Ok(Setting { magic: PORTABLE_MAGIC, count_log2, salt: salt.to_owned() })
    }

    /// The identifier, `$P$` or `$H$`.
    pub fn magic(&self) -> &'static str {
	self.magic
    }

    /// The base-2 logarithm of the number of rounds.
    pub fn count_log2(&self) -> u32 {
	self.count_log2
    }

    /// Number of rounds following the initial digest.
    pub fn rounds(&self) -> u32 {
	1 << self.count_log2
    }

    /// The encoded salt.
    pub fn salt(&self) -> &str {
	&self.salt
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
	write!(f, "{}{}{}", self.magic, ITOA64[self.count_log2 as usize] as char, self.salt)
    }
}
