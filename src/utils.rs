//! Stateless helper functions for the zkvote gadget library

use crate::error::{GadgetError, Result};
use crate::FieldElement;
use ff::PrimeField;

/// Convert up to 31 little-endian bytes into a field element using the
/// canonical byte representation expected by `ff::PrimeField::from_repr`.
///
/// 31 bytes are always below the ~255-bit modulus, so this cannot fail for
/// inputs of the documented length.
pub fn bytes31_to_field_le<F: PrimeField>(bytes31: &[u8]) -> Result<F> {
    if bytes31.len() > 31 {
        return Err(GadgetError::InvalidInput(format!(
            "{} bytes do not fit a 31-byte field encoding",
            bytes31.len()
        )));
    }
    let mut repr = <F as PrimeField>::Repr::default();
    let buf = repr.as_mut();
    buf[..bytes31.len()].copy_from_slice(bytes31);
    Option::from(F::from_repr(repr))
        .ok_or_else(|| GadgetError::InvalidInput("non-canonical field encoding".to_string()))
}

/// Canonical 32-byte little-endian encoding of a field element.
///
/// Used wherever field elements need a stable, orderable key (registry sets).
pub fn field_to_bytes32_le<F: PrimeField>(element: &F) -> [u8; 32] {
    let repr = element.to_repr();
    let bytes = repr.as_ref();
    let mut out = [0u8; 32];
    let n = bytes.len().min(32);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// Returns the value of a field element if it fits in a `u64`.
pub fn field_to_u64<F: PrimeField>(element: &F) -> Option<u64> {
    let repr = element.to_repr();
    let bytes = repr.as_ref();
    if bytes[8..].iter().any(|b| *b != 0) {
        return None;
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[..8]);
    Some(u64::from_le_bytes(low))
}

/// Parse a decimal string into a field element.
pub fn parse_field(s: &str) -> Result<FieldElement> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GadgetError::InvalidInput(format!(
            "`{}` is not a decimal field element",
            s
        )));
    }
    FieldElement::from_str_vartime(trimmed).ok_or_else(|| {
        GadgetError::InvalidInput(format!("`{}` is not below the field modulus", s))
    })
}

/// Little-endian path bits of a leaf index: bit i selects the direction at
/// depth i (`true` means the node is a right child).
pub fn index_to_path_bits(index: usize, depth: usize) -> Vec<bool> {
    (0..depth)
        .map(|i| i < usize::BITS as usize && (index >> i) & 1 == 1)
        .collect()
}

/// Inverse of [`index_to_path_bits`].
pub fn path_bits_to_index(bits: &[bool]) -> usize {
    bits.iter()
        .enumerate()
        .filter(|(_, b)| **b)
        .fold(0usize, |acc, (i, _)| acc | (1usize << i))
}

/// Map a boolean to the field elements 0 / 1.
#[inline]
pub fn bool_to_field<F: PrimeField>(b: bool) -> F {
    if b {
        F::ONE
    } else {
        F::ZERO
    }
}
