//! Simple example showing off the basics of the library.

use packed_abi::{encode, packed_keccak256, Address, EncodeValue, PackedResult, TypeDescriptor};

fn main() -> PackedResult<()> {
    pretty_env_logger::init();

    // Addresses can be parsed with or without a checksum requirement:
    let addr = Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", false)?;
    println!("Checksummed: {}", addr);
    assert!(Address::checksum_valid(&addr.to_string()));

    // Values are paired with Solidity type names and packed back to back:
    let packed = encode(
        &["address", "uint16", "bool", "string"],
        &[addr.into(), "0x2a".into(), true.into(), "gm".into()],
    )?;
    assert_eq!(packed.len(), 20 + 2 + 1 + 2);

    // Array elements, however, always take a full 32-byte slot:
    let packed = encode(&["uint8[]"], &[vec![1_u8, 2, 3].into()])?;
    assert_eq!(packed.len(), 3 * 32);

    // Numeric strings are hex. Decimal input goes through `EncodeValue::decimal`:
    let from_hex = packed_keccak256(&["uint256"], &["0x64".into()])?;
    let from_decimal = packed_keccak256(
        &["uint256"],
        &[EncodeValue::decimal("100").expect("valid decimal")],
    )?;
    assert_eq!(from_hex, from_decimal);
    println!("keccak256(uint256(100)) = {}", from_hex);

    // Types can be parsed once and reused:
    let ty: TypeDescriptor = "bytes4[2]".parse()?;
    println!("Parsed {} into {:?}", ty, ty);

    Ok(())
}
