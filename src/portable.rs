//! Iterated MD5 portable hash.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! This is the fallback scheme of PHPass, written with the __`$P$`__
//! identifier, and by phpBB3 with __`$H$`__. It's considered insecure and
//! shouldn't be used for new passwords where the consumers of the hash
//! allow anything better.
//!
//! # Example
//!
//! ```
//! use phpass::{portable, HashSetup};
//!
//! assert_eq!(portable::hash_with(
//!     HashSetup { salt: Some("F6mA2JZN"), rounds: Some(13) },
//!     "password").unwrap(),
//!     "$P$BF6mA2JZNjAWGhOm9E5o337tcwr9vm.");
//! ```
//!
//! # Parameters
//!
//! * __Password length__: unlimited here; the
//!   [`PasswordHasher`](crate::PasswordHasher) facade caps it at 4096 bytes.
//!
//! * __Salt length__: 8 characters, encoding 6 random bytes.
//!
//! * __Rounds__: 2<sup>7</sup> to 2<sup>30</sup>, after an initial digest.
//!   Default is 2<sup>13</sup>.
//!
//! # Hash Format
//!
//! The format of the hash is
//! __`$P$`__*`{rounds}`*__*`{salt}`*__*`{checksum}`*, where:
//!
//! * *`{rounds}`* is a single character whose alphabet index is the base-2
//!   logarithm of the number of rounds.
//!
//! * *`{salt}`* is the 8-character salt string.
//!
//! * *`{checksum}`* is a 22-character encoding of the 16-byte checksum.

use md5::{Md5, Digest};
use super::{Result, IntoSetting, consteq};
use crate::enc_dec::hash64_encode;
use crate::setting::Setting;

/// Default stored round exponent.
pub const DEFAULT_COUNT_LOG2: u32 = 13;
/// Length of a complete portable hash.
pub const HASH_LEN: usize = 34;
/// Length of the MD5 checksum.
pub const DIGEST_LEN: usize = 16;

/// Run the iterated digest for a password and a setting.
///
/// The salt is digested once with the password, then the result is
/// re-digested with the password `setting.rounds()` more times.
pub fn derive(pass: &[u8], setting: &Setting) -> [u8; DIGEST_LEN] {
    let mut dgst = Md5::new();
    dgst.update(setting.salt().as_bytes());
    dgst.update(pass);
    let mut hash = dgst.finalize();

    for _ in 0..setting.rounds() {
	let mut dgst = Md5::new();
	dgst.update(&hash);
	dgst.update(pass);
	hash = dgst.finalize();
    }

    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hash);
    out
}

fn do_portable_crypt(pass: &[u8], setting: &Setting) -> String {
    format!("{}{}", setting, hash64_encode(&derive(pass, setting)))
}

/// Hash a password with a randomly generated salt and default rounds.
///
/// An error is returned if the system random number generator fails.
pub fn hash<B: AsRef<[u8]>>(pass: B) -> Result<String> {
    hash_with(super::HashSetup { salt: None, rounds: None }, pass)
}

/// Hash a password with user-provided parameters.
///
/// If the `param` argument is a `&str`, it must be a settings string or a
/// complete hash; its identifier, rounds and salt are reused, and anything
/// past the first twelve characters is ignored.
pub fn hash_with<IS, B>(param: IS, pass: B) -> Result<String>
    where IS: IntoSetting, B: AsRef<[u8]>
{
    let setting = param.into_setting().map_err(|e| {
	#[cfg(feature = "tracing")]
	tracing::debug!("rejected portable setting: {}", e);
	e
    })?;
    Ok(do_portable_crypt(pass.as_ref(), &setting))
}

/// Verify that the hash corresponds to a password.
///
/// Malformed hashes never verify.
pub fn verify<B: AsRef<[u8]>>(pass: B, hash: &str) -> bool {
    consteq(hash, hash_with(hash, pass))
}

/// A __crypt__(3)-style entry point.
///
/// Returns the hash, or a two-character failure string if `setting` can't
/// be used. The failure string is `*0`, or `*1` if `setting` itself starts
/// with `*0`, so that it never matches the setting it was computed from.
pub fn crypt<B: AsRef<[u8]>>(pass: B, setting: &str) -> String {
    match hash_with(setting, pass) {
	Ok(hash) => hash,
	Err(_) if setting.starts_with("*0") => "*1".to_owned(),
	Err(e) => e.sentinel().to_owned(),
    }
}
