//! Parsing of Solidity type names (`"uint256"`, `"bytes4"`, `"address[3]"`,
//! ...) into a [`TypeDescriptor`].
//!
//! The grammar is matched against the whole type name, in this order:
//! 1. The keywords `address`, `string`, `bytes` and `bool`.
//! 2. `u?int[0-9]*`, with the width defaulting to `256`.
//! 3. `bytes[0-9]+`.
//! 4. `<element>[<count>]`, where an empty count makes the array dynamic.
//!
//! Array suffixes are peeled off the right of the name first, then the
//! remaining element name is matched against rules 1 to 3.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use lazy_regex::regex_captures;
use log::trace;
use thiserror::Error;

/// Largest integer width supported by the EVM.
pub const MAX_INT_BITS: usize = 256;

/// Largest width of a fixed size byte array.
pub const MAX_FIXED_BYTES: usize = 32;

/// Deepest array nesting accepted in a type name.
pub const MAX_ARRAY_DEPTH: usize = 64;

/// An error encountered while parsing a type name.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum TypeParseError {
    #[error("Type name does not match any supported type: {0:?}")]
    /// The name matches none of the supported patterns.
    InvalidType(String),

    #[error("Integer type must have a width that is a non-zero multiple of 8 up to 256: {0:?}")]
    /// An `intN`/`uintN` with an unsupported `N`.
    InvalidNumberType(String),

    #[error("Fixed bytes type must have a width between 1 and 32: {0:?}")]
    /// A `bytesN` with an unsupported `N`.
    InvalidBytesType(String),

    #[error("Array type has an unrepresentable length: {0:?}")]
    /// The fixed length of an array type does not fit in a `usize`.
    InvalidArrayLength(String),

    #[error("Array type is nested too deeply: {0:?}")]
    /// The type name has more array suffixes than [`MAX_ARRAY_DEPTH`].
    ArrayTooDeep(String),
}

/// How many elements an array type holds.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ArrayArity {
    /// `T[N]`: the value must hold exactly `N` elements.
    Fixed(usize),

    /// `T[]`: any number of elements.
    Dynamic,
}

/// A parsed Solidity type name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeDescriptor {
    /// `address`
    Address,

    /// `bool`
    Bool,

    /// `string`
    StringUtf8,

    /// `bytes`
    BytesDynamic,

    /// `bytesN`, with `N` in `1..=32`.
    BytesFixed(usize),

    /// `intN`/`uintN`, with `bits` a multiple of 8 in `8..=256`.
    Integer {
        /// Whether the type is `int` rather than `uint`.
        signed: bool,

        /// Width of the integer in bits.
        bits: usize,
    },

    /// `T[N]` or `T[]`.
    Array {
        /// Type of every element.
        element: Box<TypeDescriptor>,

        /// Element count constraint.
        arity: ArrayArity,
    },
}

impl TypeDescriptor {
    /// Parses a full type name.
    pub fn parse(name: &str) -> Result<Self, TypeParseError> {
        let mut element = name;
        let mut arities = Vec::new();

        // Suffixes are peeled from the right, so the outermost arity comes first.
        while let Some((inner, count)) = split_array_suffix(element) {
            if arities.len() == MAX_ARRAY_DEPTH {
                return Err(TypeParseError::ArrayTooDeep(name.to_string()));
            }

            arities.push(match count {
                "" => ArrayArity::Dynamic,
                digits => ArrayArity::Fixed(
                    digits
                        .parse()
                        .map_err(|_| TypeParseError::InvalidArrayLength(element.to_string()))?,
                ),
            });
            element = inner;
        }

        let descriptor = arities
            .into_iter()
            .rev()
            .fold(Self::parse_scalar(element)?, |inner, arity| Self::Array {
                element: Box::new(inner),
                arity,
            });

        trace!("Parsed type {:?} into {:?}", name, descriptor);
        Ok(descriptor)
    }

    fn parse_scalar(name: &str) -> Result<Self, TypeParseError> {
        match name {
            "address" => return Ok(Self::Address),
            "string" => return Ok(Self::StringUtf8),
            "bytes" => return Ok(Self::BytesDynamic),
            "bool" => return Ok(Self::Bool),
            _ => (),
        }

        if let Some((_, prefix, width)) = regex_captures!(r"^(u?int)([0-9]*)$", name) {
            let bits = match width {
                "" => Some(MAX_INT_BITS),
                digits => digits.parse::<usize>().ok(),
            };

            return match bits {
                Some(bits) if int_bits_valid(bits) => Ok(Self::Integer {
                    signed: prefix == "int",
                    bits,
                }),
                _ => Err(TypeParseError::InvalidNumberType(name.to_string())),
            };
        }

        if let Some((_, width)) = regex_captures!(r"^bytes([0-9]+)$", name) {
            return match width.parse::<usize>() {
                Ok(n) if fixed_bytes_valid(n) => Ok(Self::BytesFixed(n)),
                _ => Err(TypeParseError::InvalidBytesType(name.to_string())),
            };
        }

        Err(TypeParseError::InvalidType(name.to_string()))
    }

    /// Checks the width of an `intN`/`uintN` or `bytesN` built by hand rather
    /// than through [`TypeDescriptor::parse`]. Array elements are not visited.
    pub fn check_width(&self) -> Result<(), TypeParseError> {
        match self {
            Self::Integer { bits, .. } if !int_bits_valid(*bits) => {
                Err(TypeParseError::InvalidNumberType(self.to_string()))
            }
            Self::BytesFixed(n) if !fixed_bytes_valid(*n) => {
                Err(TypeParseError::InvalidBytesType(self.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// The innermost element type of (possibly nested) arrays, or `self` for
    /// any other type.
    pub fn base_element(&self) -> &Self {
        let mut ty = self;
        while let Self::Array { element, .. } = ty {
            ty = &**element;
        }

        ty
    }

    /// Returns `true` for the variable length types (`string` and `bytes`)
    /// that have no 32-byte slot representation in the packed scheme.
    pub const fn is_dynamic_bytes(&self) -> bool {
        matches!(self, Self::StringUtf8 | Self::BytesDynamic)
    }
}

const fn int_bits_valid(bits: usize) -> bool {
    bits != 0 && bits % 8 == 0 && bits <= MAX_INT_BITS
}

const fn fixed_bytes_valid(n: usize) -> bool {
    matches!(n, 1..=MAX_FIXED_BYTES)
}

/// Splits `T[N]` into `T` and `N` (`N` may be empty).
fn split_array_suffix(name: &str) -> Option<(&str, &str)> {
    let (element, count) = name.strip_suffix(']')?.rsplit_once('[')?;
    count
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then_some((element, count))
}

impl FromStr for TypeDescriptor {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => write!(f, "address"),
            Self::Bool => write!(f, "bool"),
            Self::StringUtf8 => write!(f, "string"),
            Self::BytesDynamic => write!(f, "bytes"),
            Self::BytesFixed(n) => write!(f, "bytes{}", n),
            Self::Integer { signed: true, bits } => write!(f, "int{}", bits),
            Self::Integer { signed: false, bits } => write!(f, "uint{}", bits),
            Self::Array {
                element,
                arity: ArrayArity::Fixed(n),
            } => write!(f, "{}[{}]", element, n),
            Self::Array {
                element,
                arity: ArrayArity::Dynamic,
            } => write!(f, "{}[]", element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrayArity, TypeDescriptor, TypeParseError, MAX_ARRAY_DEPTH};

    fn int(signed: bool, bits: usize) -> TypeDescriptor {
        TypeDescriptor::Integer { signed, bits }
    }

    fn array(element: TypeDescriptor, arity: ArrayArity) -> TypeDescriptor {
        TypeDescriptor::Array {
            element: Box::new(element),
            arity,
        }
    }

    #[test]
    fn keywords_parse() -> Result<(), TypeParseError> {
        assert_eq!(TypeDescriptor::parse("address")?, TypeDescriptor::Address);
        assert_eq!(TypeDescriptor::parse("bool")?, TypeDescriptor::Bool);
        assert_eq!(TypeDescriptor::parse("string")?, TypeDescriptor::StringUtf8);
        assert_eq!(TypeDescriptor::parse("bytes")?, TypeDescriptor::BytesDynamic);

        Ok(())
    }

    #[test]
    fn integers_parse() -> Result<(), TypeParseError> {
        assert_eq!(TypeDescriptor::parse("uint")?, int(false, 256));
        assert_eq!(TypeDescriptor::parse("int")?, int(true, 256));
        assert_eq!(TypeDescriptor::parse("uint8")?, int(false, 8));
        assert_eq!(TypeDescriptor::parse("int136")?, int(true, 136));
        assert_eq!(TypeDescriptor::parse("uint256")?, int(false, 256));

        Ok(())
    }

    #[test]
    fn invalid_integer_widths_are_rejected() {
        for name in [
            "uint0",
            "uint5",
            "int12",
            "uint264",
            "int1024",
            "uint99999999999999999999999",
        ] {
            assert_eq!(
                TypeDescriptor::parse(name),
                Err(TypeParseError::InvalidNumberType(name.to_string())),
                "{}",
                name
            );
        }
    }

    #[test]
    fn fixed_bytes_parse() -> Result<(), TypeParseError> {
        assert_eq!(TypeDescriptor::parse("bytes1")?, TypeDescriptor::BytesFixed(1));
        assert_eq!(TypeDescriptor::parse("bytes32")?, TypeDescriptor::BytesFixed(32));

        for name in ["bytes0", "bytes33", "bytes99999999999999999999999"] {
            assert_eq!(
                TypeDescriptor::parse(name),
                Err(TypeParseError::InvalidBytesType(name.to_string()))
            );
        }

        Ok(())
    }

    #[test]
    fn arrays_parse() -> Result<(), TypeParseError> {
        assert_eq!(
            TypeDescriptor::parse("address[3]")?,
            array(TypeDescriptor::Address, ArrayArity::Fixed(3))
        );
        assert_eq!(
            TypeDescriptor::parse("uint8[]")?,
            array(int(false, 8), ArrayArity::Dynamic)
        );
        assert_eq!(
            TypeDescriptor::parse("bytes4[2][]")?,
            array(
                array(TypeDescriptor::BytesFixed(4), ArrayArity::Fixed(2)),
                ArrayArity::Dynamic
            )
        );

        Ok(())
    }

    #[test]
    fn base_element_unwraps_nested_arrays() -> Result<(), TypeParseError> {
        let nested = TypeDescriptor::parse("string[2][][3]")?;
        assert_eq!(nested.base_element(), &TypeDescriptor::StringUtf8);
        assert!(nested.base_element().is_dynamic_bytes());

        let scalar = TypeDescriptor::parse("int64")?;
        assert_eq!(scalar.base_element(), &scalar);

        Ok(())
    }

    #[test]
    fn array_element_errors_propagate() {
        assert_eq!(
            TypeDescriptor::parse("uint7[2]"),
            Err(TypeParseError::InvalidNumberType("uint7".to_string()))
        );
        assert_eq!(
            TypeDescriptor::parse("[]"),
            Err(TypeParseError::InvalidType(String::new()))
        );
        assert_eq!(
            TypeDescriptor::parse("bool[99999999999999999999999]"),
            Err(TypeParseError::InvalidArrayLength(
                "bool[99999999999999999999999]".to_string()
            ))
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        for name in ["blorb", "", "Address", "uint8 ", "bool[", "bool[x]", "fixed128x18"] {
            assert!(
                matches!(
                    TypeDescriptor::parse(name),
                    Err(TypeParseError::InvalidType(_))
                ),
                "{}",
                name
            );
        }
    }

    #[test]
    fn display_is_canonical() -> Result<(), TypeParseError> {
        for (name, expected) in [
            ("uint", "uint256"),
            ("int", "int256"),
            ("bytes7", "bytes7"),
            ("address[2][]", "address[2][]"),
            ("string", "string"),
        ] {
            assert_eq!(name.parse::<TypeDescriptor>()?.to_string(), expected);
        }

        Ok(())
    }

    #[test]
    fn nesting_depth_is_capped() -> Result<(), TypeParseError> {
        let deepest = format!("bool{}", "[]".repeat(MAX_ARRAY_DEPTH));
        let mut ty = &TypeDescriptor::parse(&deepest)?;
        let mut depth = 0;
        while let TypeDescriptor::Array { element, arity } = ty {
            assert_eq!(*arity, ArrayArity::Dynamic);
            ty = &**element;
            depth += 1;
        }
        assert_eq!(depth, MAX_ARRAY_DEPTH);
        assert_eq!(ty, &TypeDescriptor::Bool);

        for suffixes in [MAX_ARRAY_DEPTH + 1, 100_000] {
            let name = format!("bool{}", "[]".repeat(suffixes));
            assert_eq!(
                TypeDescriptor::parse(&name),
                Err(TypeParseError::ArrayTooDeep(name.clone()))
            );
        }

        Ok(())
    }

    #[test]
    fn hand_built_widths_are_checked() {
        for ty in [int(true, 256), int(false, 8), TypeDescriptor::BytesFixed(32)] {
            assert_eq!(ty.check_width(), Ok(()));
        }

        for bits in [0, 12, 264] {
            let ty = int(false, bits);
            assert_eq!(
                ty.check_width(),
                Err(TypeParseError::InvalidNumberType(format!("uint{}", bits)))
            );
        }

        for n in [0, 33] {
            assert_eq!(
                TypeDescriptor::BytesFixed(n).check_width(),
                Err(TypeParseError::InvalidBytesType(format!("bytes{}", n)))
            );
        }
    }
}
