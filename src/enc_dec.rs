// Encoding and decoding routines.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

/// The radix-64 alphabet shared by crypt-style hashes and portable PHPass.
pub const ITOA64: &[u8] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// Inverse of ITOA64, indexed by (character - 0x20); 0x40 marks a non-member.
const ITOA64_DEC_MAP: &[u8] = b"\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x00\x01\
				 \x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x40\x40\x40\x40\x40\x40\
				 \x40\x0c\x0d\x0e\x0f\x10\x11\x12\x13\x14\x15\x16\x17\x18\x19\x1a\
				 \x1b\x1c\x1d\x1e\x1f\x20\x21\x22\x23\x24\x25\x40\x40\x40\x40\x40\
				 \x40\x26\x27\x28\x29\x2a\x2b\x2c\x2d\x2e\x2f\x30\x31\x32\x33\x34\
				 \x35\x36\x37\x38\x39\x3a\x3b\x3c\x3d\x3e\x3f\x40\x40\x40\x40\x40";

// Output characters per group, keyed by the number of input bytes in the group.
const GROUP_CHARS: [usize; 4] = [0, 2, 3, 4];

/// Encode bytes three at a time, least significant bits first.
///
/// A short final group emits only the characters its bits can fill:
/// one byte gives two characters, two bytes give three.
pub fn hash64_encode(bs: &[u8]) -> String {
    let mut out = String::with_capacity((bs.len() + 2) / 3 * 4);
    for group in bs.chunks(3) {
	let enc = group.iter().enumerate().fold(0u32, |acc, (i, &b)| acc | (b as u32) << (8 * i));
	for c in 0..GROUP_CHARS[group.len()] {
	    out.push(ITOA64[((enc >> (6 * c)) & 0x3F) as usize] as char);
	}
    }
    out
}

/// Return the alphabet index of `c`, or `None` if it isn't in the alphabet.
pub fn decode_index(c: char) -> Option<u32> {
    let idx = (c as u32).checked_sub(0x20)? as usize;
    match ITOA64_DEC_MAP.get(idx) {
	Some(&dec) if dec < 64 => Some(dec as u32),
	_ => None,
    }
}

/// Check that every character of `s` belongs to the alphabet.
pub fn is_hash64(s: &str) -> bool {
    s.chars().all(|c| decode_index(c).is_some())
}

#[cfg(test)]
mod tests {
    use super::{decode_index, hash64_encode, is_hash64, ITOA64};

    #[test]
    fn encode_fixed_sizes() {
	assert_eq!(hash64_encode(&[1, 2, 3]), "/6k.");
	assert_eq!(hash64_encode(&[0, 1, 2, 3, 4, 5]), ".2U.1EE/");
	let digest = (0u8..16).collect::<Vec<_>>();
	assert_eq!(hash64_encode(&digest), ".2U.1EE/4Q.07ck0AoU1D.");
	assert_eq!(hash64_encode(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]), "F6mA2JZN");
    }

    #[test]
    fn encode_partial_groups() {
	assert_eq!(hash64_encode(&[]), "");
	assert_eq!(hash64_encode(&[0xff]), "z1");
	assert_eq!(hash64_encode(&[0xff, 0xff]), "zzD");
	assert_eq!(hash64_encode(&[0xff, 0xff, 0xff]), "zzzz");
    }

    #[test]
    fn index_lookup() {
	for (i, &c) in ITOA64.iter().enumerate() {
	    assert_eq!(decode_index(c as char), Some(i as u32));
	}
	assert_eq!(decode_index('$'), None);
	assert_eq!(decode_index('-'), None);
	assert_eq!(decode_index('\n'), None);
	assert_eq!(decode_index('\u{7f}'), None);
	assert_eq!(decode_index('é'), None);
    }

    #[test]
    fn alphabet_membership() {
	assert!(is_hash64("F6mA2JZN"));
	assert!(!is_hash64("F6mA2JZ$"));
    }
}
