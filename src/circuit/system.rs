//! Signal and constraint primitives on top of the R1CS frontend.
//!
//! Gadgets never touch a global constraint system: every helper here takes
//! the constraint-system handle explicitly, and every allocation happens in
//! a caller-chosen namespace.

use ff::PrimeField;
use nova_snark::frontend::{gadgets::num::AllocatedNum, ConstraintSystem, SynthesisError};

/// Visibility of a declared signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Instance variable, known to the verifier.
    PublicInput,
    /// Auxiliary variable, known only to the prover.
    PrivateInput,
}

/// Declares a signal bound to `value` (which may be absent during setup).
pub fn declare_signal<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    kind: SignalKind,
    value: Option<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
    match kind {
        SignalKind::PublicInput => AllocatedNum::alloc_input(cs.namespace(|| "public"), || {
            value.ok_or(SynthesisError::AssignmentMissing)
        }),
        SignalKind::PrivateInput => AllocatedNum::alloc(cs.namespace(|| "private"), || {
            value.ok_or(SynthesisError::AssignmentMissing)
        }),
    }
}

/// Exposes a computed signal as a public output.
pub fn expose_output<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    num: &AllocatedNum<F>,
) -> Result<(), SynthesisError> {
    num.inputize(cs.namespace(|| "output"))
}

/// Asserts `a * b = c`.
pub fn add_constraint<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
    c: &AllocatedNum<F>,
) {
    cs.enforce(
        || "product",
        |lc| lc + a.get_variable(),
        |lc| lc + b.get_variable(),
        |lc| lc + c.get_variable(),
    );
}

/// Allocates `a * b` and constrains it.
pub fn mul<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let product = AllocatedNum::alloc(cs.namespace(|| "product_value"), || {
        let a = a.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        let b = b.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(a * b)
    })?;
    add_constraint(cs.namespace(|| "product_constraint"), a, b, &product);
    Ok(product)
}

/// Asserts `a = b`.
pub fn enforce_equal<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    a: &AllocatedNum<F>,
    b: &AllocatedNum<F>,
) {
    cs.enforce(
        || "equal",
        |lc| lc + a.get_variable(),
        |lc| lc + CS::one(),
        |lc| lc + b.get_variable(),
    );
}

/// Asserts `a = k` for a circuit constant `k`.
pub fn enforce_constant<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    a: &AllocatedNum<F>,
    k: F,
) {
    cs.enforce(
        || "is_constant",
        |lc| lc + a.get_variable(),
        |lc| lc + CS::one(),
        |lc| lc + (k, CS::one()),
    );
}

/// Allocates a signal pinned to the constant `k`.
pub fn alloc_constant<F: PrimeField, CS: ConstraintSystem<F>>(
    mut cs: CS,
    k: F,
) -> Result<AllocatedNum<F>, SynthesisError> {
    let num = AllocatedNum::alloc(cs.namespace(|| "constant"), || Ok(k))?;
    enforce_constant(cs.namespace(|| "pin"), &num, k);
    Ok(num)
}
