//! Hashes of packed encodings, rendered the way `solidityPackedKeccak256` and
//! `solidityPackedSha256` render them (`0x` + lowercase hex).

use ethereum_types::H256;
use sha2::{Digest, Sha256};
use web3_common::hex_bytes::encode_hex;

use crate::{
    packed::{encode, PackedResult},
    value::EncodeValue,
};

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> H256 {
    keccak_hash::keccak(data)
}

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> H256 {
    H256::from_slice(&Sha256::digest(data))
}

/// Keccak-256 of the packed encoding of `values`.
pub fn packed_keccak256<S: AsRef<str>>(
    types: &[S],
    values: &[EncodeValue],
) -> PackedResult<String> {
    let packed = encode(types, values)?;
    Ok(encode_hex(keccak256(&packed), true))
}

/// SHA-256 of the packed encoding of `values`.
pub fn packed_sha256<S: AsRef<str>>(
    types: &[S],
    values: &[EncodeValue],
) -> PackedResult<String> {
    let packed = encode(types, values)?;
    Ok(encode_hex(sha256(&packed), true))
}

#[cfg(test)]
mod tests {
    use web3_common::{hex_bytes::encode_hex, EMPTY_KECCAK_HASH, EMPTY_SHA256_HASH};

    use super::{keccak256, packed_keccak256, packed_sha256, sha256};
    use crate::packed::PackedError;

    #[test]
    fn raw_digests_work() {
        assert_eq!(keccak256(&[]), EMPTY_KECCAK_HASH);
        assert_eq!(sha256(&[]), EMPTY_SHA256_HASH);
    }

    #[test]
    fn empty_input_hashes_the_empty_string() -> Result<(), PackedError> {
        let no_types: [&str; 0] = [];

        assert_eq!(
            packed_keccak256(&no_types, &[])?,
            encode_hex(EMPTY_KECCAK_HASH, true)
        );
        assert_eq!(
            packed_sha256(&["string"], &["".into()])?,
            encode_hex(EMPTY_SHA256_HASH, true)
        );

        Ok(())
    }
}
