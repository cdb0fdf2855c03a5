//! Conversions between hex text and raw bytes.
//!
//! Two decoding conventions are supported:
//! - [`decode_hex`] treats its input as plain data: an odd number of digits is
//!   normalized by prepending a `0`, so `"1"` decodes to `[0x01]`.
//! - [`decode_quantity_hex`] follows the JSON-RPC "quantity" convention, where
//!   the leading zero nibble of the most significant byte is omitted.
//!
//! Both accept an optional `0x`/`0X` prefix.

use thiserror::Error;

/// Errors encountered when decoding hex text.
#[derive(Clone, Debug, Eq, Error, PartialEq, Hash)]
pub enum HexError {
    /// The input contains a non-hex character or is too short to be a
    /// quantity.
    #[error("Malformed hex string: {0:?}")]
    Malformed(String),
}

/// Strips a leading `0x` or `0X` if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes a hex string into bytes.
///
/// An empty string (after the prefix is removed) yields no bytes. Odd length
/// input is left padded with a single `0` digit before decoding.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, HexError> {
    let digits = strip_hex_prefix(s);
    if digits.is_empty() {
        return Ok(Vec::new());
    }

    if digits.len() % 2 == 0 {
        decode_digits(digits, s)
    } else {
        decode_digits(&format!("0{}", digits), s)
    }
}

/// Decodes a hex string that uses the JSON-RPC quantity convention.
///
/// The literal `"0"` is the empty byte string. When the digit count is odd,
/// the first digit is decoded as a standalone byte and the remainder as
/// regular byte pairs.
pub fn decode_quantity_hex(s: &str) -> Result<Vec<u8>, HexError> {
    if s.len() < 2 {
        return match s {
            "0" => Ok(Vec::new()),
            _ => Err(HexError::Malformed(s.to_string())),
        };
    }

    let digits = strip_hex_prefix(s);
    if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(HexError::Malformed(s.to_string()));
    }

    if digits.len() % 2 == 0 {
        return decode_digits(digits, s);
    }

    // All digits are ASCII at this point, so splitting at byte 1 is safe.
    let (head, tail) = digits.split_at(1);
    let mut bytes = Vec::with_capacity(tail.len() / 2 + 1);
    bytes.push(
        nibble_value(head.as_bytes()[0]).ok_or_else(|| HexError::Malformed(s.to_string()))?,
    );
    bytes.extend(decode_digits(tail, s)?);

    Ok(bytes)
}

/// Renders bytes as lowercase hex, optionally with a `0x` prefix.
pub fn encode_hex<T: AsRef<[u8]>>(bytes: T, prefixed: bool) -> String {
    let digits = hex::encode(bytes);
    if prefixed {
        format!("0x{}", digits)
    } else {
        digits
    }
}

/// Returns the value of a single ASCII hex digit.
pub fn nibble_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// `original` is only used to report the caller's input in the error.
fn decode_digits(digits: &str, original: &str) -> Result<Vec<u8>, HexError> {
    hex::decode(digits).map_err(|_| HexError::Malformed(original.to_string()))
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{decode_hex, decode_quantity_hex, encode_hex, strip_hex_prefix, HexError};

    #[test]
    fn strip_prefix_handles_both_cases() {
        assert_eq!(strip_hex_prefix("0xab"), "ab");
        assert_eq!(strip_hex_prefix("0Xab"), "ab");
        assert_eq!(strip_hex_prefix("ab"), "ab");
        assert_eq!(strip_hex_prefix("0x"), "");
    }

    #[test]
    fn decode_hex_works() -> Result<(), HexError> {
        assert_eq!(decode_hex("0xdeadbeef")?, hex!("deadbeef"));
        assert_eq!(decode_hex("DEADBEEF")?, hex!("deadbeef"));
        assert_eq!(decode_hex("0x")?, Vec::<u8>::new());
        assert_eq!(decode_hex("")?, Vec::<u8>::new());

        Ok(())
    }

    #[test]
    fn decode_hex_pads_odd_length() -> Result<(), HexError> {
        assert_eq!(decode_hex("1")?, hex!("01"));
        assert_eq!(decode_hex("0x123")?, hex!("0123"));

        Ok(())
    }

    #[test]
    fn decode_hex_rejects_non_hex_chars() {
        assert_eq!(
            decode_hex("0xzz"),
            Err(HexError::Malformed("0xzz".to_string()))
        );
        assert!(decode_hex("0x12 4").is_err());
        assert!(decode_hex("0x0x12").is_err());
    }

    #[test]
    fn decode_quantity_hex_works() -> Result<(), HexError> {
        assert_eq!(decode_quantity_hex("0")?, Vec::<u8>::new());
        assert_eq!(decode_quantity_hex("0x0")?, hex!("00"));
        assert_eq!(decode_quantity_hex("0x1")?, hex!("01"));
        assert_eq!(decode_quantity_hex("0x400")?, hex!("0400"));
        assert_eq!(decode_quantity_hex("ff")?, hex!("ff"));
        assert_eq!(decode_quantity_hex("0x")?, Vec::<u8>::new());

        Ok(())
    }

    #[test]
    fn decode_quantity_hex_rejects_short_and_malformed_input() {
        assert!(decode_quantity_hex("").is_err());
        assert!(decode_quantity_hex("a").is_err());
        assert!(decode_quantity_hex("0xg1").is_err());
        assert!(decode_quantity_hex("0x1g").is_err());
        assert!(decode_quantity_hex("-1").is_err());
    }

    #[test]
    fn encode_hex_works() {
        assert_eq!(encode_hex(hex!("00ff10"), false), "00ff10");
        assert_eq!(encode_hex(hex!("00ff10"), true), "0x00ff10");
        assert_eq!(encode_hex([], true), "0x");
    }

    #[test]
    fn encode_then_decode_is_identity() -> Result<(), HexError> {
        let mut rng = StdRng::seed_from_u64(0);

        for len in 0..64 {
            let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            assert_eq!(decode_hex(&encode_hex(&bytes, false))?, bytes);
            assert_eq!(decode_hex(&encode_hex(&bytes, true))?, bytes);
        }

        Ok(())
    }
}
