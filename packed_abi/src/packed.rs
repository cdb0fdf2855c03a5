//! The packed (`abi.encodePacked`) encoder.
//!
//! Each top-level value is encoded with the minimal width of its type and the
//! results are concatenated without separators or length prefixes. Values
//! reached through an array are the exception: every element occupies a full
//! 32-byte slot. Numbers, booleans and addresses are left padded into that
//! slot while `bytesN` is right padded, matching Solidity.

use log::{debug, trace};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;
use thiserror::Error;
use web3_common::{
    hex_bytes::{decode_hex, strip_hex_prefix, HexError},
    WORD_LEN,
};

use crate::{
    address::{Address, AddressError},
    type_descriptor::{ArrayArity, TypeDescriptor, TypeParseError},
    utils::{left_pad, right_pad},
    value::EncodeValue,
};

/// Width in bits of every integer encoded inside an array.
const ARRAY_ELEMENT_BITS: usize = WORD_LEN * 8;

/// Stores the result of packing. Returns a [`PackedError`] upon failure.
pub type PackedResult<T> = Result<T, PackedError>;

/// An error encountered while packing values.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum PackedError {
    #[error(transparent)]
    /// A type name could not be parsed.
    Type(#[from] TypeParseError),

    #[error(transparent)]
    /// A hex value could not be decoded.
    Hex(#[from] HexError),

    #[error(transparent)]
    /// An `address` value could not be parsed.
    Address(#[from] AddressError),

    #[error("Expected {expected} values for {type_name} but got {found}")]
    /// A fixed array got the wrong number of elements, or the type and value
    /// lists differ in length (reported with the type name `values`).
    InvalidArrayLength {
        /// The array type, or `values` for the top-level lists.
        type_name: String,

        /// Number of elements required.
        expected: usize,

        /// Number of elements supplied.
        found: usize,
    },

    #[error("Type {0} has no packed encoding as an array element")]
    /// `string` or `bytes` used as the element of an array.
    InvalidType(String),

    #[error("A {kind} value cannot be encoded as {type_name}")]
    /// The value's variant does not match what the type reads.
    InvalidValue {
        /// The type the value was paired with.
        type_name: String,

        /// The variant that was supplied.
        kind: &'static str,
    },

    #[error("Value for {type_name} must hold exactly {expected} bytes but holds {found}")]
    /// A `bytesN` value of the wrong length.
    InvalidValueTypeForType {
        /// The `bytesN` type.
        type_name: String,

        /// `N`.
        expected: usize,

        /// Length of the decoded value.
        found: usize,
    },

    #[error("Value {value} is below the minimum of a {width} bit integer")]
    /// A value smaller than the smallest representable at the target width.
    NumericTooLow {
        /// The rejected value.
        value: BigInt,

        /// Target width in bits.
        width: usize,
    },

    #[error("Value {value} is above the maximum of a {width} bit integer")]
    /// A value larger than the largest representable at the target width.
    NumericTooHigh {
        /// The rejected value.
        value: BigInt,

        /// Target width in bits.
        width: usize,
    },

    #[error("Cannot pad {len} bytes into {target} bytes")]
    /// Data longer than the padding target.
    BufferOverrun {
        /// Length of the data.
        len: usize,

        /// Requested padded length.
        target: usize,
    },
}

/// Packs each `(type, value)` pair and concatenates the results in order.
///
/// Type names are parsed as they are reached, so a malformed name only fails
/// the call once every value before it has been packed successfully.
pub fn encode<S: AsRef<str>>(types: &[S], values: &[EncodeValue]) -> PackedResult<Vec<u8>> {
    check_counts(types.len(), values.len())?;
    debug!("Packing {} values", values.len());

    let mut out = Vec::new();
    for (name, value) in types.iter().zip(values) {
        let descriptor = TypeDescriptor::parse(name.as_ref())?;
        out.extend(pack_one(&descriptor, value, false)?);
    }

    Ok(out)
}

/// Same as [`encode`], for callers that already hold parsed types.
pub fn encode_with_descriptors(
    types: &[TypeDescriptor],
    values: &[EncodeValue],
) -> PackedResult<Vec<u8>> {
    check_counts(types.len(), values.len())?;
    debug!("Packing {} values", values.len());

    let mut out = Vec::new();
    for (descriptor, value) in types.iter().zip(values) {
        out.extend(pack_one(descriptor, value, false)?);
    }

    Ok(out)
}

/// Packs a single value.
///
/// `inside_array` selects the 32-byte slot layout used for array elements;
/// callers packing a top-level value pass `false`.
pub fn pack_one(
    descriptor: &TypeDescriptor,
    value: &EncodeValue,
    inside_array: bool,
) -> PackedResult<Vec<u8>> {
    let packed = match descriptor {
        TypeDescriptor::StringUtf8 | TypeDescriptor::BytesDynamic if inside_array => {
            return Err(PackedError::InvalidType(descriptor.to_string()))
        }
        TypeDescriptor::Address => {
            let addr = Address::parse(expect_str(descriptor, value)?, false)?;
            if inside_array {
                left_pad(addr.as_bytes(), WORD_LEN)?
            } else {
                addr.as_bytes().to_vec()
            }
        }
        TypeDescriptor::StringUtf8 => expect_str(descriptor, value)?.as_bytes().to_vec(),
        TypeDescriptor::BytesDynamic => decode_hex(expect_str(descriptor, value)?)?,
        TypeDescriptor::Bool => {
            let byte = match value {
                EncodeValue::Bool(b) => u8::from(*b),
                _ => return Err(invalid_value(descriptor, value)),
            };
            if inside_array {
                left_pad(&[byte], WORD_LEN)?
            } else {
                vec![byte]
            }
        }
        TypeDescriptor::Integer { signed, bits } => {
            descriptor.check_width()?;
            let width = if inside_array {
                ARRAY_ELEMENT_BITS
            } else {
                *bits
            };
            let int = integer_value(descriptor, value)?;
            let magnitude = if *signed {
                to_twos(&int, width)?
            } else {
                to_unsigned(&int, width)?
            };

            left_pad(&minimal_be_bytes(&magnitude), width / 8)?
        }
        TypeDescriptor::BytesFixed(n) => {
            descriptor.check_width()?;
            let bytes = decode_hex(expect_str(descriptor, value)?)?;
            if bytes.len() != *n {
                return Err(PackedError::InvalidValueTypeForType {
                    type_name: descriptor.to_string(),
                    expected: *n,
                    found: bytes.len(),
                });
            }

            if inside_array {
                right_pad(&bytes, WORD_LEN)?
            } else {
                bytes
            }
        }
        TypeDescriptor::Array { element, arity } => {
            pack_array(descriptor, element, *arity, value)?
        }
    };

    trace!(
        "Packed {} (inside array: {}) into {} bytes",
        descriptor,
        inside_array,
        packed.len()
    );
    Ok(packed)
}

fn pack_array(
    descriptor: &TypeDescriptor,
    element: &TypeDescriptor,
    arity: ArrayArity,
    value: &EncodeValue,
) -> PackedResult<Vec<u8>> {
    // Checked up front so that empty arrays of these types are rejected too.
    if element.base_element().is_dynamic_bytes() {
        return Err(PackedError::InvalidType(descriptor.to_string()));
    }

    let elems = value
        .as_array()
        .ok_or_else(|| invalid_value(descriptor, value))?;

    if let ArrayArity::Fixed(n) = arity {
        if n != elems.len() {
            return Err(PackedError::InvalidArrayLength {
                type_name: descriptor.to_string(),
                expected: n,
                found: elems.len(),
            });
        }
    }

    let mut out = Vec::with_capacity(elems.len() * WORD_LEN);
    for elem in elems {
        out.extend(pack_one(element, elem, true)?);
    }

    Ok(out)
}

/// Converts `value` into its two's complement representation at `width` bits.
///
/// Non-negative values are returned unchanged. Negative values become
/// `2^width - |value|`. A zero `width` is rejected as an invalid `int0` type.
pub fn to_twos(value: &BigInt, width: usize) -> PackedResult<BigUint> {
    if width == 0 {
        return Err(TypeParseError::InvalidNumberType(format!("int{}", width)).into());
    }

    let limit = BigUint::one() << (width - 1);
    let abs = value.magnitude();

    match value.sign() {
        Sign::Minus => {
            if abs > &limit {
                return Err(PackedError::NumericTooLow {
                    value: value.clone(),
                    width,
                });
            }

            // `abs < 2^width`, so xor with the mask is the same as `!abs & mask`.
            let mask = (BigUint::one() << width) - 1u8;
            Ok((&mask ^ abs) + 1u8)
        }
        Sign::NoSign | Sign::Plus => {
            if abs >= &limit {
                return Err(PackedError::NumericTooHigh {
                    value: value.clone(),
                    width,
                });
            }

            Ok(abs.clone())
        }
    }
}

fn to_unsigned(value: &BigInt, width: usize) -> PackedResult<BigUint> {
    if value.sign() == Sign::Minus {
        return Err(PackedError::NumericTooLow {
            value: value.clone(),
            width,
        });
    }

    let magnitude = value.magnitude();
    if magnitude.bits() > width as u64 {
        return Err(PackedError::NumericTooHigh {
            value: value.clone(),
            width,
        });
    }

    Ok(magnitude.clone())
}

/// Big endian bytes without leading zeros. Zero is the empty slice.
fn minimal_be_bytes(v: &BigUint) -> Vec<u8> {
    match v.bits() {
        0 => Vec::new(),
        _ => v.to_bytes_be(),
    }
}

/// Reads an integer from either an already parsed number or hex text with an
/// optional leading `-` and an optional `0x` prefix.
fn integer_value(descriptor: &TypeDescriptor, value: &EncodeValue) -> PackedResult<BigInt> {
    match value {
        EncodeValue::Int(i) => Ok(i.clone()),
        EncodeValue::Str(s) => Ok(parse_hex_integer(s)?),
        _ => Err(invalid_value(descriptor, value)),
    }
}

/// Parses signed hex text such as `"0x1f"`, `"-0x80"` or `"ff"`.
pub fn parse_hex_integer(s: &str) -> Result<BigInt, HexError> {
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (Sign::Minus, rest),
        None => (Sign::Plus, s),
    };

    if strip_hex_prefix(unsigned).is_empty() {
        return Err(HexError::Malformed(s.to_string()));
    }

    let bytes = decode_hex(unsigned).map_err(|_| HexError::Malformed(s.to_string()))?;
    Ok(BigInt::from_bytes_be(sign, &bytes))
}

fn expect_str<'a>(descriptor: &TypeDescriptor, value: &'a EncodeValue) -> PackedResult<&'a str> {
    match value {
        EncodeValue::Str(s) => Ok(s),
        _ => Err(invalid_value(descriptor, value)),
    }
}

fn invalid_value(descriptor: &TypeDescriptor, value: &EncodeValue) -> PackedError {
    PackedError::InvalidValue {
        type_name: descriptor.to_string(),
        kind: value.kind(),
    }
}

fn check_counts(types: usize, values: usize) -> PackedResult<()> {
    if types != values {
        return Err(PackedError::InvalidArrayLength {
            type_name: "values".to_string(),
            expected: types,
            found: values,
        });
    }

    Ok(())
}
