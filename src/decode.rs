//! XOR de-obfuscation of archive scripts.
//!
//! Every byte of a stored script is XORed with [`XOR_KEY`]. Decoding is
//! total and length preserving, and because XOR with a fixed key is its own
//! inverse the same function also re-obfuscates.
//!
//! ```
//! use dungeon_extract::decode::decode_script;
//!
//! let stored = [!b'O', !b'K'];
//! assert_eq!(decode_script(&stored), b"OK");
//! assert_eq!(decode_script(&decode_script(b"OK")), b"OK");
//! ```

/// The fixed single-byte key applied to every script byte.
pub const XOR_KEY: u8 = 0xFF;

/// Returns a decoded copy of `raw`.
#[must_use]
pub fn decode_script(raw: &[u8]) -> Vec<u8> {
    let mut out = raw.to_vec();
    decode_in_place(&mut out);
    out
}

/// Decodes `buf` in place.
pub fn decode_in_place(buf: &mut [u8]) {
    for b in buf {
        *b ^= XOR_KEY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_script_flips_all_bits() {
        assert_eq!(decode_script(&[0x00, 0xFF, 0x0F]), vec![0xFF, 0x00, 0xF0]);
    }

    #[test]
    fn test_decode_script_text() {
        let stored: Vec<u8> = b"Spawns: 2\n".iter().map(|b| !b).collect();
        assert_eq!(decode_script(&stored), b"Spawns: 2\n");
    }

    #[test]
    fn test_decode_script_empty() {
        assert!(decode_script(&[]).is_empty());
    }

    #[test]
    fn test_decode_is_involution() {
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(decode_script(&decode_script(&all)), all);
    }

    #[test]
    fn test_decode_in_place_matches_copy() {
        let original = b"1\t10\r\n2\t20".to_vec();
        let mut buf = original.clone();
        decode_in_place(&mut buf);
        assert_eq!(buf, decode_script(&original));
        decode_in_place(&mut buf);
        assert_eq!(buf, original);
    }
}
