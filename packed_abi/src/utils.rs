//! Zero padding helpers shared by the encoder.
//!
//! Solidity pads numeric values on the left (keeping them right aligned in
//! their slot) and fixed size byte strings on the right. Both directions are
//! kept as separate functions since mixing them up silently corrupts hashes.

use crate::packed::{PackedError, PackedResult};

/// Places `data` at the end of a zeroed buffer of `len` bytes.
pub fn left_pad(data: &[u8], len: usize) -> PackedResult<Vec<u8>> {
    let offset = pad_offset(data, len)?;
    let mut out = vec![0; len];
    out[offset..].copy_from_slice(data);

    Ok(out)
}

/// Places `data` at the start of a zeroed buffer of `len` bytes.
pub fn right_pad(data: &[u8], len: usize) -> PackedResult<Vec<u8>> {
    pad_offset(data, len)?;
    let mut out = vec![0; len];
    out[..data.len()].copy_from_slice(data);

    Ok(out)
}

fn pad_offset(data: &[u8], len: usize) -> PackedResult<usize> {
    len.checked_sub(data.len())
        .ok_or(PackedError::BufferOverrun {
            len: data.len(),
            target: len,
        })
}
