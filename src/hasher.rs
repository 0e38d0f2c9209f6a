//! Configured password hasher.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! [`PasswordHasher`] mirrors the PHPass object: it is built once from an
//! iteration count exponent and a portability flag, then used for any
//! number of `hash_password` and `check_password` calls. It holds no
//! mutable state and can be shared between threads.
//!
//! # Example
//!
//! ```
//! use phpass::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(8, true);
//! assert!(hasher.check_password("test12345", "$P$9IQRaTwmfeRo7ud9Fh4E2PdI0S3r.L0"));
//! ```

use super::Result;
use crate::error::Error;
use crate::{portable, random};
use crate::setting::{gen_portable, SALT_SEED_LEN};

/// Longest accepted password, in bytes.
pub const MAX_PASSWORD_LEN: usize = 4096;

/// Base-2 logarithm of the iteration count, always within [4,31].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IterationCountLog2(u32);

impl IterationCountLog2 {
    /// Smallest accepted value.
    pub const MIN: u32 = 4;
    /// Largest accepted value.
    pub const MAX: u32 = 31;
    /// Value substituted for anything out of range.
    pub const DEFAULT: u32 = 8;

    /// Normalize a requested exponent.
    ///
    /// Out-of-range values are replaced by the default, not rejected.
    pub fn new(log2: i32) -> IterationCountLog2 {
	if log2 < Self::MIN as i32 || log2 > Self::MAX as i32 {
	    IterationCountLog2(Self::DEFAULT)
	} else {
	    IterationCountLog2(log2 as u32)
	}
    }

    /// The normalized exponent.
    pub fn get(self) -> u32 {
	self.0
    }
}

impl Default for IterationCountLog2 {
    fn default() -> Self {
	IterationCountLog2(Self::DEFAULT)
    }
}

/// Hashing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashMode {
    /// Portable MD5-based hashes.
    Portable,
    /// Stronger native schemes (Blowfish, extended DES); not implemented.
    Native,
}

impl Default for HashMode {
    fn default() -> Self {
	HashMode::Portable
    }
}

/// Immutable hasher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HasherConfig {
    /// Iteration count exponent before the format's offset is applied.
    pub iteration_count_log2: IterationCountLog2,
    /// Hashing mode.
    pub mode: HashMode,
}

/// A password hasher with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    config: HasherConfig,
}

impl PasswordHasher {
    /// Create a hasher.
    ///
    /// `iteration_count_log2` outside [4,31] is silently replaced by 8.
    /// Passing `false` for `portable` selects [`HashMode::Native`], which
    /// can verify portable hashes but can't produce any.
    pub fn new(iteration_count_log2: i32, portable: bool) -> PasswordHasher {
	PasswordHasher::with_config(HasherConfig {
	    iteration_count_log2: IterationCountLog2::new(iteration_count_log2),
	    mode: if portable { HashMode::Portable } else { HashMode::Native },
	})
    }

    /// Create a hasher from a configuration value.
    pub fn with_config(config: HasherConfig) -> PasswordHasher {
	PasswordHasher { config }
    }

    /// The hasher's configuration.
    pub fn config(&self) -> &HasherConfig {
	&self.config
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Passwords longer than 4096 bytes are rejected rather than truncated.
    pub fn hash_password<B: AsRef<[u8]>>(&self, pass: B) -> Result<String> {
	let pass = pass.as_ref();
	if pass.len() > MAX_PASSWORD_LEN {
	    #[cfg(feature = "tracing")]
	    tracing::debug!("refusing to hash a password of {} bytes", pass.len());
	    return Err(Error::PasswordTooLong);
	}
	match self.config.mode {
	    HashMode::Portable => {
		let mut seed = [0u8; SALT_SEED_LEN];
		random::gen_salt_bytes(&mut seed)?;
		self.hash_with_seed(pass, &seed)
	    },
	    HashMode::Native => Err(Error::UnsupportedMode),
	}
    }

    fn hash_with_seed(&self, pass: &[u8], seed: &[u8; SALT_SEED_LEN]) -> Result<String> {
	let setting = gen_portable(seed, self.config.iteration_count_log2.get());
	match portable::hash_with(setting.as_str(), pass) {
	    Ok(hash) if hash.len() == portable::HASH_LEN => Ok(hash),
	    _ => {
		#[cfg(feature = "tracing")]
		tracing::debug!("portable hashing failed for setting {}", setting);
		Err(Error::HashingFailed)
	    },
	}
    }

    /// Check a password against a stored hash.
    ///
    /// The salt and rounds come from `stored_hash`, so hashes made with a
    /// different configuration still verify. Any problem with the input
    /// yields `false`.
    pub fn check_password<B: AsRef<[u8]>>(&self, pass: B, stored_hash: &str) -> bool {
	let pass = pass.as_ref();
	if pass.len() > MAX_PASSWORD_LEN {
	    return false;
	}
	portable::verify(pass, stored_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::{HashMode, HasherConfig, IterationCountLog2, PasswordHasher, MAX_PASSWORD_LEN};
    use crate::error::Error;
    use proptest::prelude::*;

    const SEED: [u8; 6] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
    const GOLDEN: &str = "$P$BF6mA2JZNjAWGhOm9E5o337tcwr9vm.";

    #[test]
    fn golden_vector() {
	let hasher = PasswordHasher::new(8, true);
	assert_eq!(hasher.hash_with_seed(b"password", &SEED).unwrap(), GOLDEN);
	assert!(hasher.check_password("password", GOLDEN));
	let hasher = PasswordHasher::new(4, true);
	assert_eq!(hasher.hash_with_seed(b"password", &SEED).unwrap(), "$P$7F6mA2JZNE1aW1c7e2u6ixRj7rs/Ip.");
    }

    #[test]
    fn count_normalization() {
	assert_eq!(IterationCountLog2::new(2).get(), 8);
	assert_eq!(IterationCountLog2::new(40).get(), 8);
	assert_eq!(IterationCountLog2::new(-1).get(), 8);
	assert_eq!(IterationCountLog2::new(4).get(), 4);
	assert_eq!(IterationCountLog2::new(31).get(), 31);
	for &log2 in &[2, 40] {
	    let hasher = PasswordHasher::new(log2, true);
	    assert_eq!(hasher.config(), PasswordHasher::new(8, true).config());
	    assert_eq!(hasher.hash_with_seed(b"password", &SEED).unwrap(), GOLDEN);
	}
    }

    #[test]
    fn defaults() {
	let config = HasherConfig::default();
	assert_eq!(config.iteration_count_log2.get(), 8);
	assert_eq!(config.mode, HashMode::Portable);
	assert_eq!(PasswordHasher::default().config(), &config);
    }

    #[test]
    fn native_mode_unsupported() {
	let hasher = PasswordHasher::new(8, false);
	assert_eq!(hasher.config().mode, HashMode::Native);
	assert_eq!(hasher.hash_password("password"), Err(Error::UnsupportedMode));
	assert!(hasher.check_password("password", GOLDEN));
    }

    #[test]
    fn password_length_limit() {
	let hasher = PasswordHasher::new(4, true);
	let long = vec![b'a'; MAX_PASSWORD_LEN + 1];
	assert_eq!(hasher.hash_password(&long), Err(Error::PasswordTooLong));
	assert!(!hasher.check_password(&long, GOLDEN));
	let max = vec![b'a'; MAX_PASSWORD_LEN];
	let h = hasher.hash_password(&max).unwrap();
	assert_eq!(h.len(), 34);
	assert!(hasher.check_password(&max, &h));
    }

    #[test]
    fn verifies_other_configurations() {
	let old = PasswordHasher::new(4, true).hash_password("password").unwrap();
	assert!(old.starts_with("$P$7"));
	assert!(PasswordHasher::new(10, true).check_password("password", &old));
    }

    #[test]
    fn malformed_hashes() {
	let hasher = PasswordHasher::default();
	assert!(!hasher.check_password("password", ""));
	assert!(!hasher.check_password("password", "short"));
	assert!(!hasher.check_password("password", "$X$BF6mA2JZNjAWGhOm9E5o337tcwr9vm."));
	assert!(!hasher.check_password("password", "*0"));
    }

    #[test]
    fn shareable() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<PasswordHasher>();
    }

    proptest! {
	#![proptest_config(ProptestConfig::with_cases(32))]

	#[test]
	fn round_trip(pass in prop::collection::vec(any::<u8>(), 0..64)) {
	    let hasher = PasswordHasher::new(4, true);
	    let h = hasher.hash_password(&pass).unwrap();
	    prop_assert_eq!(h.len(), 34);
	    prop_assert!(h.starts_with("$P$"));
	    prop_assert!(hasher.check_password(&pass, &h));
	}

	#[test]
	fn wrong_password_rejected(pass in "[ -~]{1,32}", flip in any::<prop::sample::Index>(), bit in 0u8..8) {
	    let hasher = PasswordHasher::new(4, true);
	    let h = hasher.hash_password(&pass).unwrap();
	    let mut other = pass.clone().into_bytes();
	    let i = flip.index(other.len());
	    other[i] ^= 1 << bit;
	    prop_assert!(!hasher.check_password(&other, &h));
	}

	#[test]
	fn tampered_digest_rejected(pos in 12usize..34, step in 1usize..64) {
	    let hasher = PasswordHasher::new(8, true);
	    let alphabet = crate::enc_dec::ITOA64;
	    let mut tampered = GOLDEN.as_bytes().to_vec();
	    let cur = alphabet.iter().position(|&c| c == tampered[pos]).unwrap();
	    tampered[pos] = alphabet[(cur + step) % 64];
	    let tampered = String::from_utf8(tampered).unwrap();
	    prop_assert!(!hasher.check_password("password", &tampered));
	}
    }
}
