//! Ballot gadgets: choice range checks, commitments, nullifiers and
//! one-of-n indicators.

use ff::Field;
use nova_snark::frontend::{
    gadgets::num::AllocatedNum, ConstraintSystem, LinearCombination, SynthesisError,
};

use super::bits::strict_range;
use super::compare::{assert_less_than, is_equal_constant, is_zero};
use super::hash::CompressionGadget;
use crate::config;
use crate::error::GadgetError;
use crate::FieldElement;

/// Proves `0 <= choice < num_choices`.
///
/// `num_choices_signal` must carry the value `num_choices`. The range check
/// alone only bounds `choice` by a power of two, so the strict comparison is
/// always added as well.
pub fn constrain_choice<CS: ConstraintSystem<FieldElement>>(
    mut cs: CS,
    choice: &AllocatedNum<FieldElement>,
    num_choices_signal: &AllocatedNum<FieldElement>,
    num_choices: usize,
) -> Result<(), SynthesisError> {
    let width = config::choice_bits(num_choices);
    strict_range(cs.namespace(|| "choice_range"), choice, width)?;
    assert_less_than(
        cs.namespace(|| "choice_below_num_choices"),
        choice,
        num_choices_signal,
        width,
    )
}

/// `compress4(choice, identity, salt, ballot_id)`.
pub fn vote_commitment<H, CS>(
    mut cs: CS,
    choice: &AllocatedNum<FieldElement>,
    identity: &AllocatedNum<FieldElement>,
    salt: &AllocatedNum<FieldElement>,
    ballot_id: &AllocatedNum<FieldElement>,
) -> Result<AllocatedNum<FieldElement>, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    H::hash_gadget(
        cs.namespace(|| "commitment"),
        &[
            choice.clone(),
            identity.clone(),
            salt.clone(),
            ballot_id.clone(),
        ],
    )
}

/// `compress2(identity, ballot_id)`.
pub fn nullifier<H, CS>(
    mut cs: CS,
    identity: &AllocatedNum<FieldElement>,
    ballot_id: &AllocatedNum<FieldElement>,
) -> Result<AllocatedNum<FieldElement>, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    H::hash_gadget(
        cs.namespace(|| "nullifier"),
        &[identity.clone(), ballot_id.clone()],
    )
}

/// Indicator vector for `value` over `[0, n)`: entry `j` is 1 iff
/// `value = j`. Exactly one entry is set, so any `value` outside the range is
/// unsatisfiable.
pub fn one_of_n<CS: ConstraintSystem<FieldElement>>(
    mut cs: CS,
    value: &AllocatedNum<FieldElement>,
    n: usize,
) -> Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
    if n == 0 {
        return Err(
            GadgetError::Configuration("one-of-n over an empty range".to_string())
                .into_synthesis_error(),
        );
    }
    let indicators = (0..n)
        .map(|j| {
            is_equal_constant(
                cs.namespace(|| format!("is_{}", j)),
                value,
                FieldElement::from(j as u64),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let sum = indicators
        .iter()
        .fold(LinearCombination::zero(), |lc, ind| lc + ind.get_variable());
    cs.enforce(
        || "exactly_one",
        |_| sum,
        |lc| lc + CS::one(),
        |lc| lc + CS::one(),
    );
    Ok(indicators)
}

/// Returns 1 if `value` equals some member of `set`, else 0.
pub fn is_one_of<CS: ConstraintSystem<FieldElement>>(
    mut cs: CS,
    value: &AllocatedNum<FieldElement>,
    set: &[FieldElement],
) -> Result<AllocatedNum<FieldElement>, SynthesisError> {
    let (first, rest) = set.split_first().ok_or_else(|| {
        GadgetError::Configuration("membership test against an empty set".to_string())
            .into_synthesis_error()
    })?;

    // prod_i (value - s_i) vanishes iff value is in the set
    let mut product = AllocatedNum::alloc(cs.namespace(|| "factor_0"), || {
        let v = value.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(v - first)
    })?;
    cs.enforce(
        || "factor_0_def",
        |lc| lc + value.get_variable() - (*first, CS::one()),
        |lc| lc + CS::one(),
        |lc| lc + product.get_variable(),
    );

    for (i, member) in rest.iter().enumerate() {
        let member = *member;
        let next = AllocatedNum::alloc(cs.namespace(|| format!("product_{}", i + 1)), || {
            let p = product.get_value().ok_or(SynthesisError::AssignmentMissing)?;
            let v = value.get_value().ok_or(SynthesisError::AssignmentMissing)?;
            Ok(p * (v - member))
        })?;
        cs.enforce(
            || format!("product_{}_def", i + 1),
            |lc| lc + product.get_variable(),
            |lc| lc + value.get_variable() - (member, CS::one()),
            |lc| lc + next.get_variable(),
        );
        product = next;
    }

    is_zero(cs.namespace(|| "product_is_zero"), &product)
}

/// Sums indicator columns: `counts[j] = sum_i indicators[i][j]`.
pub fn tally_counts<CS: ConstraintSystem<FieldElement>>(
    mut cs: CS,
    indicators: &[Vec<AllocatedNum<FieldElement>>],
    num_choices: usize,
) -> Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
    (0..num_choices)
        .map(|j| {
            let column: Vec<&AllocatedNum<FieldElement>> = indicators
                .iter()
                .map(|row| {
                    row.get(j).ok_or_else(|| {
                        GadgetError::StructuralMismatch {
                            what: "indicator row".to_string(),
                            expected: num_choices,
                            got: row.len(),
                        }
                        .into_synthesis_error()
                    })
                })
                .collect::<Result<_, _>>()?;

            let count = AllocatedNum::alloc(cs.namespace(|| format!("count_{}", j)), || {
                column.iter().try_fold(FieldElement::ZERO, |acc, ind| {
                    ind.get_value()
                        .map(|v| acc + v)
                        .ok_or(SynthesisError::AssignmentMissing)
                })
            })?;
            let sum = column
                .iter()
                .fold(LinearCombination::zero(), |lc, ind| lc + ind.get_variable());
            cs.enforce(
                || format!("count_{}_def", j),
                |_| sum,
                |lc| lc + CS::one(),
                |lc| lc + count.get_variable(),
            );
            Ok(count)
        })
        .collect()
}
