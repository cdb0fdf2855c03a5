//! Ethereum account addresses and their EIP-55 checksummed text form.
//!
//! EIP-55 hides a checksum in the letter casing of the hex rendering: the
//! lowercase hex text is hashed with Keccak-256, and every letter whose
//! corresponding hash nibble is `>= 8` is uppercased. Digits are never
//! affected, so an address made only of digits has a single valid rendering.

use std::{
    fmt::{self, Debug, Display, LowerHex},
    str::FromStr,
};

use ethereum_types::H160;
use keccak_hash::keccak;
use thiserror::Error;
use web3_common::{
    hex_bytes::{decode_hex, encode_hex, strip_hex_prefix},
    ADDRESS_LEN,
};

/// Number of hex digits in a rendered address.
const ADDRESS_HEX_LEN: usize = ADDRESS_LEN * 2;

/// An error encountered when constructing an [`Address`].
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum AddressError {
    #[error("Address must be exactly 40 hex characters with an optional 0x prefix: {0:?}")]
    /// The text is not 40 hex digits.
    Malformed(String),

    #[error("Address checksum mismatch (found: {found}, expected: {expected})")]
    /// The letter casing does not match the EIP-55 checksum.
    ChecksumWrong {
        /// The address text as supplied.
        found: String,

        /// The correctly checksummed rendering of the same bytes.
        expected: String,
    },

    #[error("Address must be built from exactly 20 bytes (got {0})")]
    /// A raw byte slice of the wrong size.
    WrongLength(usize),
}

/// A 20-byte account address.
///
/// Equality and hashing only look at the raw bytes, so the casing of the text
/// an address was parsed from never matters once it is constructed.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all zero address.
    pub const ZERO: Self = Self([0; ADDRESS_LEN]);

    /// Parses a hex address with or without a `0x` prefix.
    ///
    /// When `require_checksum` is set, the casing of every letter must match
    /// the EIP-55 checksum exactly. Otherwise any casing is accepted.
    pub fn parse(s: &str, require_checksum: bool) -> Result<Self, AddressError> {
        let digits = strip_hex_prefix(s);
        if digits.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::Malformed(s.to_string()));
        }

        let bytes = decode_hex(digits).map_err(|_| AddressError::Malformed(s.to_string()))?;
        let addr = Self::from_raw(&bytes)?;

        if require_checksum {
            let expected = checksum_digits(&addr.0);
            if digits != expected {
                return Err(AddressError::ChecksumWrong {
                    found: s.to_string(),
                    expected: format!("0x{}", expected),
                });
            }
        }

        Ok(addr)
    }

    /// Builds an address from exactly 20 raw bytes.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, AddressError> {
        let raw: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::WrongLength(bytes.len()))?;

        Ok(Self(raw))
    }

    /// The raw address bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Renders the address as `0x` followed by 40 hex digits, either all
    /// lowercase or with EIP-55 casing.
    pub fn to_hex(&self, checksummed: bool) -> String {
        if checksummed {
            format!("0x{}", checksum_digits(&self.0))
        } else {
            encode_hex(self.0, true)
        }
    }

    /// Returns `true` if `s` is an address whose casing matches its checksum.
    pub fn checksum_valid(s: &str) -> bool {
        Self::parse(s, true).is_ok()
    }
}

/// Computes the 40 EIP-55 cased hex digits (without prefix) for `bytes`.
fn checksum_digits(bytes: &[u8; ADDRESS_LEN]) -> String {
    let lower = encode_hex(bytes, false);
    let hash = keccak(lower.as_bytes());

    lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let byte = hash.0[i / 2];
            let nibble = match i % 2 {
                0 => byte >> 4,
                _ => byte & 0x0f,
            };

            if nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parses without requiring a valid checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, false)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex(true))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex(true))
    }
}

impl LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }

        write!(f, "{}", encode_hex(self.0, false))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(raw: [u8; ADDRESS_LEN]) -> Self {
        Self(raw)
    }
}

impl From<Address> for [u8; ADDRESS_LEN] {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl From<H160> for Address {
    fn from(h: H160) -> Self {
        Self(h.0)
    }
}

impl From<Address> for H160 {
    fn from(addr: Address) -> Self {
        H160(addr.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex(true))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        Self::parse(&s, false).map_err(serde::de::Error::custom)
    }
}
