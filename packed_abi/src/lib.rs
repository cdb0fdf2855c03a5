//! Solidity "packed" ABI encoding and checksummed Ethereum addresses.
//!
//! The packed scheme (`abi.encodePacked`) concatenates values using their
//! minimal width instead of the 32-byte slots and offset tables of the
//! standard ABI. The one exception is array elements, which still occupy a
//! full 32-byte slot each. Hashing the packed bytes with Keccak-256 or
//! SHA-256 is how `solidityPackedKeccak256`/`solidityPackedSha256` style
//! digests are produced.
//!
//! The core entry points are:
//! - [`encode`][packed::encode], which takes parallel lists of type names and
//!   [`EncodeValue`][value::EncodeValue]s and returns the packed bytes.
//! - [`packed_keccak256`][digest::packed_keccak256] and
//!   [`packed_sha256`][digest::packed_sha256], which hash those bytes.
//! - [`Address`][address::Address], a 20-byte account identifier that parses
//!   and renders EIP-55 checksummed text.
//!
//! Type names are parsed into a closed
//! [`TypeDescriptor`][type_descriptor::TypeDescriptor] before encoding, so the
//! encoder only ever dispatches on a known set of variants.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod address;
pub mod digest;
pub mod packed;
pub mod type_descriptor;
pub mod utils;
pub mod value;

#[cfg(test)]
pub(crate) mod testing_utils;

pub use address::{Address, AddressError};
pub use digest::{packed_keccak256, packed_sha256};
pub use packed::{encode, encode_with_descriptors, PackedError, PackedResult};
pub use type_descriptor::{ArrayArity, TypeDescriptor, TypeParseError};
pub use value::EncodeValue;
