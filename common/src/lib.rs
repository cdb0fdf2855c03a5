//! Shared building blocks for the packed encoder: hex text codecs and a few
//! well-known digests.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

use ethereum_types::H256;

pub mod hex_bytes;

/// The Keccak-256 hash of the empty byte string.
/// 0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470
pub const EMPTY_KECCAK_HASH: H256 = H256([
    197, 210, 70, 1, 134, 247, 35, 60, 146, 126, 125, 178, 220, 199, 3, 192, 229, 0, 182, 83, 202,
    130, 39, 59, 123, 250, 216, 4, 93, 133, 164, 112,
]);

/// The SHA-256 hash of the empty byte string.
/// 0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
pub const EMPTY_SHA256_HASH: H256 = H256([
    227, 176, 196, 66, 152, 252, 28, 20, 154, 251, 244, 200, 153, 111, 185, 36, 39, 174, 65, 228,
    100, 155, 147, 76, 164, 149, 153, 27, 120, 82, 184, 85,
]);

/// Number of bytes in an account address.
pub const ADDRESS_LEN: usize = 20;

/// Size of a single ABI slot in bytes.
pub const WORD_LEN: usize = 32;

#[test]
fn test_empty_keccak_hash() {
    assert_eq!(EMPTY_KECCAK_HASH, keccak_hash::keccak([]));
}

#[test]
fn test_empty_sha256_hash() {
    use sha2::{Digest, Sha256};

    assert_eq!(EMPTY_SHA256_HASH, H256::from_slice(&Sha256::digest(b"")));
}
