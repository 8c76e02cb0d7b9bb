//! Conditional selection on a boolean-constrained signal.
//!
//! The selector is an `AllocatedNum` produced by the bit gadgets rather than
//! the frontend's `Boolean`, matching the bit representation in `bits`;
//! `conditional_select` on `&Boolean` would need every direction bit
//! converted first.

use ff::PrimeField;
use nova_snark::frontend::{gadgets::num::AllocatedNum, ConstraintSystem, SynthesisError};

/// Returns `if_true` when `bit = 1` and `if_false` when `bit = 0`.
///
/// The caller is responsible for `bit` being boolean-constrained; a
/// non-boolean bit yields the affine combination of both branches.
pub fn conditional_select<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    bit: &AllocatedNum<F>,
    if_false: &AllocatedNum<F>,
    if_true: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let result = AllocatedNum::alloc(cs.namespace(|| "selected"), || {
        let b = bit.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        let t = if_true.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        let f = if_false.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(f + b * (t - f))
    })?;

    // result - if_false = bit * (if_true - if_false)
    cs.enforce(
        || "select",
        |lc| lc + bit.get_variable(),
        |lc| lc + if_true.get_variable() - if_false.get_variable(),
        |lc| lc + result.get_variable() - if_false.get_variable(),
    );

    Ok(result)
}

/// Orders `(current, sibling)` into `(left, right)` for a tree node.
///
/// `direction = 0` places the current node on the left.
pub fn order_pair<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    direction: &AllocatedNum<F>,
    current: &AllocatedNum<F>,
    sibling: &AllocatedNum<F>,
) -> Result<(AllocatedNum<F>, AllocatedNum<F>), SynthesisError> {
    let left = conditional_select(cs.namespace(|| "left"), direction, current, sibling)?;
    let right = conditional_select(cs.namespace(|| "right"), direction, sibling, current)?;
    Ok((left, right))
}
