//! Zero tests, equality and ordered comparison gadgets.
//!
//! All results are boolean-valued signals (0 or 1). Ordered comparisons are
//! only sound when both operands are already known to fit in `n` bits.

use ff::{PrimeField, PrimeFieldBits};
use nova_snark::frontend::{gadgets::num::AllocatedNum, ConstraintSystem, SynthesisError};

use super::bits::to_bits;
use crate::circuit::system::enforce_constant;
use crate::error::GadgetError;

/// Returns 1 if `x = 0`, else 0.
///
/// Uses the standard inverse trick: `x * inv = 1 - out` and `x * out = 0`.
pub fn is_zero<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    x: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let inv = AllocatedNum::alloc(cs.namespace(|| "inverse"), || {
        let v = x.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(Option::from(v.invert()).unwrap_or(F::ZERO))
    })?;
    let out = AllocatedNum::alloc(cs.namespace(|| "is_zero"), || {
        let v = x.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(if v.is_zero_vartime() { F::ONE } else { F::ZERO })
    })?;

    cs.enforce(
        || "x_times_inverse",
        |lc| lc + x.get_variable(),
        |lc| lc + inv.get_variable(),
        |lc| lc + CS::one() - out.get_variable(),
    );
    cs.enforce(
        || "x_times_out",
        |lc| lc + x.get_variable(),
        |lc| lc + out.get_variable(),
        |lc| lc,
    );
    Ok(out)
}

/// Returns 1 if `a = b`, else 0.
pub fn is_equal<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let diff = AllocatedNum::alloc(cs.namespace(|| "difference"), || {
        let a = a.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        let b = b.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(a - b)
    })?;
    cs.enforce(
        || "difference_def",
        |lc| lc + a.get_variable() - b.get_variable(),
        |lc| lc + CS::one(),
        |lc| lc + diff.get_variable(),
    );
    is_zero(cs.namespace(|| "difference_is_zero"), &diff)
}

/// Returns 1 if `x = k` for a circuit constant `k`, else 0.
pub fn is_equal_constant<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    x: &AllocatedNum<F>,
    k: F,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let diff = AllocatedNum::alloc(cs.namespace(|| "difference"), || {
        let x = x.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(x - k)
    })?;
    cs.enforce(
        || "difference_def",
        |lc| lc + x.get_variable() - (k, CS::one()),
        |lc| lc + CS::one(),
        |lc| lc + diff.get_variable(),
    );
    is_zero(cs.namespace(|| "difference_is_zero"), &diff)
}

/// Returns 1 if `a < b`, else 0, for `a, b < 2^n`.
///
/// Decomposes `a + 2^n - b` into `n + 1` bits; the top bit is set exactly
/// when `a >= b`.
pub fn less_than<F, CS>(
    mut cs: CS,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
    n: usize,
) -> Result<AllocatedNum<F>, SynthesisError>
where
    F: PrimeField + PrimeFieldBits,
    CS: ConstraintSystem<F>,
{
    if n == 0 || n + 1 > F::CAPACITY as usize {
        return Err(GadgetError::Configuration(format!(
            "comparison width {} outside [1, {}]",
            n,
            F::CAPACITY - 1
        ))
        .into_synthesis_error());
    }
    let offset = F::from(2u64).pow_vartime([n as u64]);

    let shifted = AllocatedNum::alloc(cs.namespace(|| "shifted_difference"), || {
        let a = a.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        let b = b.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(a + offset - b)
    })?;
    cs.enforce(
        || "shifted_difference_def",
        |lc| lc + a.get_variable() + (offset, CS::one()) - b.get_variable(),
        |lc| lc + CS::one(),
        |lc| lc + shifted.get_variable(),
    );

    let bits = to_bits(cs.namespace(|| "shifted_bits"), &shifted, n + 1)?;
    let top = &bits.bits()[n];

    let lt = AllocatedNum::alloc(cs.namespace(|| "lt"), || {
        let t = top.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(F::ONE - t)
    })?;
    cs.enforce(
        || "lt_def",
        |lc| lc + CS::one() - top.get_variable(),
        |lc| lc + CS::one(),
        |lc| lc + lt.get_variable(),
    );
    Ok(lt)
}

/// Asserts `a < b` for `a, b < 2^n`.
pub fn assert_less_than<F, CS>(
    mut cs: CS,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
    n: usize,
) -> Result<(), SynthesisError>
where
    F: PrimeField + PrimeFieldBits,
    CS: ConstraintSystem<F>,
{
    let lt = less_than(cs.namespace(|| "less_than"), a, b, n)?;
    enforce_constant(cs.namespace(|| "less_than_holds"), &lt, F::ONE);
    Ok(())
}

/// Returns 1 if `lo <= x <= hi`, else 0, for operands below `2^n`.
pub fn in_range<F, CS>(
    mut cs: CS,
    x: &AllocatedNum<F>,
    lo: &AllocatedNum<F>,
    hi: &AllocatedNum<F>,
    n: usize,
) -> Result<AllocatedNum<F>, SynthesisError>
where
    F: PrimeField + PrimeFieldBits,
    CS: ConstraintSystem<F>,
{
    // x < lo  or  hi < x  means out of range
    let below = less_than(cs.namespace(|| "below_lower"), x, lo, n)?;
    let above = less_than(cs.namespace(|| "above_upper"), hi, x, n)?;

    let inside = AllocatedNum::alloc(cs.namespace(|| "inside"), || {
        let below = below.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        let above = above.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok((F::ONE - below) * (F::ONE - above))
    })?;
    cs.enforce(
        || "inside_def",
        |lc| lc + CS::one() - below.get_variable(),
        |lc| lc + CS::one() - above.get_variable(),
        |lc| lc + inside.get_variable(),
    );
    Ok(inside)
}
