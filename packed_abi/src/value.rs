//! The dynamically shaped values fed to the packed encoder.
//!
//! Which variant is expected depends on the type the value is paired with:
//! `bool` wants [`EncodeValue::Bool`], arrays want [`EncodeValue::Array`], and
//! every other type reads a string. Integer types additionally accept
//! [`EncodeValue::Int`] for callers that already hold a number.

use std::str::FromStr;

use enum_as_inner::EnumAsInner;
use ethereum_types::U256;
use num_bigint::{BigInt, BigUint, ParseBigIntError};

use crate::address::Address;

/// A single value to encode.
#[derive(Clone, Debug, EnumAsInner, Eq, Hash, PartialEq)]
pub enum EncodeValue {
    /// A boolean, for `bool`.
    Bool(bool),

    /// Text. Depending on the paired type this is hex (`address`, `bytes`,
    /// `bytesN`), a hex quantity with an optional leading `-` (`intN`,
    /// `uintN`) or arbitrary UTF-8 (`string`).
    Str(String),

    /// An already parsed integer, for `intN`/`uintN`.
    Int(BigInt),

    /// The elements of an array, for `T[N]`/`T[]`.
    Array(Vec<EncodeValue>),
}

impl EncodeValue {
    /// Parses base 10 text into an [`EncodeValue::Int`].
    ///
    /// Numeric strings passed as [`EncodeValue::Str`] are always read as hex,
    /// so this is the way to feed decimal input to the encoder.
    pub fn decimal(s: &str) -> Result<Self, ParseBigIntError> {
        Ok(Self::Int(BigInt::from_str(s)?))
    }

    /// A short name of the variant, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Array(_) => "array",
        }
    }
}

impl From<bool> for EncodeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for EncodeValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for EncodeValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Address> for EncodeValue {
    fn from(v: Address) -> Self {
        Self::Str(v.to_hex(false))
    }
}

impl From<BigInt> for EncodeValue {
    fn from(v: BigInt) -> Self {
        Self::Int(v)
    }
}

impl From<BigUint> for EncodeValue {
    fn from(v: BigUint) -> Self {
        Self::Int(v.into())
    }
}

impl From<U256> for EncodeValue {
    fn from(v: U256) -> Self {
        let mut buf = [0; 32];
        v.to_big_endian(&mut buf);

        Self::Int(BigUint::from_bytes_be(&buf).into())
    }
}

impl<T: Into<EncodeValue>> From<Vec<T>> for EncodeValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from_primitive_int {
    ($($type:ty),*) => {$(
        impl From<$type> for EncodeValue {
            fn from(v: $type) -> Self {
                Self::Int(BigInt::from(v))
            }
        }
    )*};
}

impl_from_primitive_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[cfg(feature = "serde")]
pub use self::json::UnsupportedJsonValue;

#[cfg(feature = "serde")]
mod json {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use thiserror::Error;

    use super::EncodeValue;

    /// A JSON value with no [`EncodeValue`] counterpart (`null`, objects and
    /// non-integral numbers).
    #[derive(Debug, Error)]
    #[error("JSON value cannot be used as a packed encoding input: {0}")]
    pub struct UnsupportedJsonValue(pub Value);

    impl EncodeValue {
        /// Converts the natural JSON shape of a value: booleans, strings,
        /// integral numbers and (nested) arrays of those.
        pub fn from_json(v: Value) -> Result<Self, UnsupportedJsonValue> {
            match v {
                Value::Bool(b) => Ok(Self::Bool(b)),
                Value::String(s) => Ok(Self::Str(s)),
                Value::Number(ref n) => match (n.as_i64(), n.as_u64()) {
                    (Some(i), _) => Ok(i.into()),
                    (None, Some(u)) => Ok(u.into()),
                    (None, None) => Err(UnsupportedJsonValue(v)),
                },
                Value::Array(elems) => Ok(Self::Array(
                    elems
                        .into_iter()
                        .map(Self::from_json)
                        .collect::<Result<_, _>>()?,
                )),
                Value::Null | Value::Object(_) => Err(UnsupportedJsonValue(v)),
            }
        }
    }

    impl<'de> Deserialize<'de> for EncodeValue {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let v = Value::deserialize(deserializer)?;
            Self::from_json(v).map_err(serde::de::Error::custom)
        }
    }
}
