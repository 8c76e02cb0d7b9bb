//! Bit decomposition gadgets.
//!
//! Bits are raw `AllocatedNum`s constrained to `b * (b - 1) = 0`, not the
//! frontend's `AllocatedBit`/`Boolean`. `AllocatedBit::alloc` takes an
//! `Option<bool>`, so a prover-supplied direction or index outside `{0, 1}`
//! could never be expressed; as field values it reaches the constraint system
//! and is rejected by the named `bit_is_boolean` constraint. The same bits
//! feed arithmetic (weighted sums, selection) without `Boolean::lc`
//! conversions.

use ff::{PrimeField, PrimeFieldBits};
use nova_snark::frontend::{
    gadgets::num::AllocatedNum, ConstraintSystem, LinearCombination, SynthesisError,
};

use crate::error::GadgetError;
use crate::utils::bool_to_field;

/// A fixed-width little-endian vector of boolean-constrained signals.
#[derive(Clone, Debug)]
pub struct BitVector<F: PrimeField> {
    bits: Vec<AllocatedNum<F>>,
}

impl<F: PrimeField> BitVector<F> {
    /// Declared width.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn bits(&self) -> &[AllocatedNum<F>] {
        &self.bits
    }

    pub fn into_bits(self) -> Vec<AllocatedNum<F>> {
        self.bits
    }

    /// Bit values, if assigned.
    pub fn get_values(&self) -> Option<Vec<bool>> {
        self.bits
            .iter()
            .map(|b| b.get_value().map(|v| v == F::ONE))
            .collect()
    }
}

/// Enforces `b * (b - 1) = 0`.
pub fn assert_boolean<F: PrimeField, CS: ConstraintSystem<F>>(mut cs: CS, b: &AllocatedNum<F>) {
    cs.enforce(
        || "boolean",
        |lc| lc + b.get_variable(),
        |lc| lc + b.get_variable() - CS::one(),
        |lc| lc,
    );
}

/// Allocates a boolean-constrained signal from a raw field value.
pub fn alloc_bit<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    value: Option<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let bit = AllocatedNum::alloc(cs.namespace(|| "bit"), || {
        value.ok_or(SynthesisError::AssignmentMissing)
    })?;
    assert_boolean(cs.namespace(|| "bit_is_boolean"), &bit);
    Ok(bit)
}

/// `sum_i 2^i * bits[i]` as a linear combination.
pub(crate) fn weighted_sum<F: PrimeField>(bits: &[AllocatedNum<F>]) -> LinearCombination<F> {
    let mut lc = LinearCombination::zero();
    let mut coeff = F::ONE;
    for b in bits {
        lc = lc + (coeff, b.get_variable());
        coeff = coeff.double();
    }
    lc
}

/// Decomposes `x` into `width` little-endian bits.
///
/// Each bit is boolean-constrained and their weighted sum is constrained to
/// equal `x`. When `x >= 2^width` the low bits cannot recompose to `x`, so
/// the witness is unsatisfiable.
pub fn to_bits<F, CS>(
    mut cs: CS,
    x: &AllocatedNum<F>,
    width: usize,
) -> Result<BitVector<F>, SynthesisError>
where
    F: PrimeField + PrimeFieldBits,
    CS: ConstraintSystem<F>,
{
    if width == 0 || width > F::NUM_BITS as usize {
        return Err(GadgetError::Configuration(format!(
            "bit width {} outside [1, {}]",
            width,
            F::NUM_BITS
        ))
        .into_synthesis_error());
    }

    let values: Option<Vec<bool>> = x
        .get_value()
        .map(|v| v.to_le_bits().iter().take(width).map(|b| *b).collect());

    let mut bits = Vec::with_capacity(width);
    for i in 0..width {
        let bit = alloc_bit(
            cs.namespace(|| format!("bit_{}", i)),
            values.as_ref().map(|v| bool_to_field(v[i])),
        )?;
        bits.push(bit);
    }

    let sum = weighted_sum(&bits);
    cs.enforce(
        || "recompose",
        |_| sum,
        |lc| lc + CS::one(),
        |lc| lc + x.get_variable(),
    );

    Ok(BitVector { bits })
}

/// Proves `x` lies in `[0, 2^width)`.
///
/// Widths above the field capacity would admit a second, wrapped bit
/// representation for small values, so they are refused outright.
pub fn strict_range<F, CS>(
    cs: CS,
    x: &AllocatedNum<F>,
    width: usize,
) -> Result<BitVector<F>, SynthesisError>
where
    F: PrimeField + PrimeFieldBits,
    CS: ConstraintSystem<F>,
{
    if width > F::CAPACITY as usize {
        return Err(GadgetError::Configuration(format!(
            "range width {} exceeds field capacity {}",
            width,
            F::CAPACITY
        ))
        .into_synthesis_error());
    }
    to_bits(cs, x, width)
}

/// Recomposes a bit vector into a single signal.
pub fn from_bits<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    bits: &BitVector<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let value = bits.get_values().map(|vals| {
        let mut acc = F::ZERO;
        let mut coeff = F::ONE;
        for b in vals {
            if b {
                acc += coeff;
            }
            coeff = coeff.double();
        }
        acc
    });
    let num = AllocatedNum::alloc(cs.namespace(|| "value"), || {
        value.ok_or(SynthesisError::AssignmentMissing)
    })?;

    let sum = weighted_sum(bits.bits());
    cs.enforce(
        || "weighted_sum",
        |_| sum,
        |lc| lc + CS::one(),
        |lc| lc + num.get_variable(),
    );
    Ok(num)
}
