//! Pluggable compression primitives.
//!
//! A [`CompressionGadget`] folds one or more field elements into one, both
//! natively and inside a constraint system, with identical results. Tree,
//! commitment and nullifier gadgets are generic over it; which primitive is
//! used is decided by the caller at configuration time.

use std::fmt::Debug;

use nova_snark::frontend::{
    gadgets::{
        num::AllocatedNum,
        poseidon::{Elt, Simplex, SpongeAPI, SpongeCircuit, SpongeTrait},
    },
    ConstraintSystem, SynthesisError,
};

use crate::circuit::system::{alloc_constant, mul};
use crate::config::{self, HashPrimitive};
use crate::error::{GadgetError, Result};
use crate::mimc::{mimc_hash, round_constants};
use crate::poseidon::{io_pattern, poseidon_hash, POSEIDON_CONSTANTS};
use crate::FieldElement;

/// A deterministic many-to-one compression function usable in and out of
/// circuit.
pub trait CompressionGadget: Clone + Copy + Debug + Default + Send + Sync + 'static {
    /// Short identifier used in logs and namespaces.
    const NAME: &'static str;

    /// The configuration value that selects this primitive.
    const PRIMITIVE: HashPrimitive;

    /// Native evaluation.
    fn hash(inputs: &[FieldElement]) -> Result<FieldElement>;

    /// In-circuit evaluation. An out-of-range arity is a
    /// [`GadgetError::Configuration`] once converted back from
    /// `SynthesisError`.
    fn hash_gadget<CS: ConstraintSystem<FieldElement>>(
        cs: CS,
        inputs: &[AllocatedNum<FieldElement>],
    ) -> std::result::Result<AllocatedNum<FieldElement>, SynthesisError>;
}

fn check_gadget_arity(arity: usize) -> std::result::Result<(), SynthesisError> {
    config::validate_arity(arity).map_err(GadgetError::into_synthesis_error)
}

/// Poseidon sponge (rate 2, standard strength).
#[derive(Clone, Copy, Debug, Default)]
pub struct PoseidonCompression;

impl CompressionGadget for PoseidonCompression {
    const NAME: &'static str = "poseidon";
    const PRIMITIVE: HashPrimitive = HashPrimitive::Poseidon;

    fn hash(inputs: &[FieldElement]) -> Result<FieldElement> {
        poseidon_hash(inputs)
    }

    fn hash_gadget<CS: ConstraintSystem<FieldElement>>(
        mut cs: CS,
        inputs: &[AllocatedNum<FieldElement>],
    ) -> std::result::Result<AllocatedNum<FieldElement>, SynthesisError> {
        check_gadget_arity(inputs.len())?;

        let mut hash_ns = cs.namespace(|| "sponge");
        let mut sponge = SpongeCircuit::new_with_constants(&*POSEIDON_CONSTANTS, Simplex);
        let elts: Vec<Elt<FieldElement>> = inputs.iter().cloned().map(Elt::Allocated).collect();

        sponge.start(io_pattern(inputs.len()), None, &mut hash_ns);
        SpongeAPI::absorb(&mut sponge, inputs.len() as u32, &elts, &mut hash_ns);
        let output = SpongeAPI::squeeze(&mut sponge, 1, &mut hash_ns);
        sponge
            .finish(&mut hash_ns)
            .map_err(|_| SynthesisError::Unsatisfiable)?;

        let first = output.first().ok_or(SynthesisError::Unsatisfiable)?;
        Elt::ensure_allocated(first, &mut hash_ns, true)
    }
}

/// MiMC-7 in multi-input Miyaguchi-Preneel mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct MimcCompression;

/// One keyed MiMC-7 permutation, four constraints per round.
fn mimc7_gadget<CS: ConstraintSystem<FieldElement>>(
    mut cs: CS,
    x: &AllocatedNum<FieldElement>,
    k: &AllocatedNum<FieldElement>,
) -> std::result::Result<AllocatedNum<FieldElement>, SynthesisError> {
    let k_var = k.get_variable();
    let mut state = x.clone();

    for (i, c) in round_constants().iter().enumerate() {
        let mut cs = cs.namespace(|| format!("round_{}", i));
        let c = *c;
        let s_var = state.get_variable();
        let t = state.get_value().zip(k.get_value()).map(|(s, k)| s + k + c);

        let t2 = AllocatedNum::alloc(cs.namespace(|| "t2"), || {
            t.map(|t| t * t).ok_or(SynthesisError::AssignmentMissing)
        })?;
        cs.enforce(
            || "t2_def",
            |lc| lc + s_var + k_var + (c, CS::one()),
            |lc| lc + s_var + k_var + (c, CS::one()),
            |lc| lc + t2.get_variable(),
        );
        let t4 = mul(cs.namespace(|| "t4"), &t2, &t2)?;
        let t6 = mul(cs.namespace(|| "t6"), &t4, &t2)?;

        let next = AllocatedNum::alloc(cs.namespace(|| "t7"), || {
            let t6 = t6.get_value().ok_or(SynthesisError::AssignmentMissing)?;
            let t = t.ok_or(SynthesisError::AssignmentMissing)?;
            Ok(t6 * t)
        })?;
        cs.enforce(
            || "t7_def",
            |lc| lc + t6.get_variable(),
            |lc| lc + s_var + k_var + (c, CS::one()),
            |lc| lc + next.get_variable(),
        );
        state = next;
    }

    let out = AllocatedNum::alloc(cs.namespace(|| "output"), || {
        let s = state.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        let k = k.get_value().ok_or(SynthesisError::AssignmentMissing)?;
        Ok(s + k)
    })?;
    cs.enforce(
        || "output_def",
        |lc| lc + state.get_variable() + k_var,
        |lc| lc + CS::one(),
        |lc| lc + out.get_variable(),
    );
    Ok(out)
}

impl CompressionGadget for MimcCompression {
    const NAME: &'static str = "mimc";
    const PRIMITIVE: HashPrimitive = HashPrimitive::Mimc;

    fn hash(inputs: &[FieldElement]) -> Result<FieldElement> {
        mimc_hash(inputs)
    }

    fn hash_gadget<CS: ConstraintSystem<FieldElement>>(
        mut cs: CS,
        inputs: &[AllocatedNum<FieldElement>],
    ) -> std::result::Result<AllocatedNum<FieldElement>, SynthesisError> {
        check_gadget_arity(inputs.len())?;

        let mut r = alloc_constant(cs.namespace(|| "initial_key"), FieldElement::from(0u64))?;
        for (i, x) in inputs.iter().enumerate() {
            let mut cs = cs.namespace(|| format!("absorb_{}", i));
            let h = mimc7_gadget(cs.namespace(|| "permute"), x, &r)?;

            // r' = r + x + E_r(x)
            let next = AllocatedNum::alloc(cs.namespace(|| "chain"), || {
                let r = r.get_value().ok_or(SynthesisError::AssignmentMissing)?;
                let x = x.get_value().ok_or(SynthesisError::AssignmentMissing)?;
                let h = h.get_value().ok_or(SynthesisError::AssignmentMissing)?;
                Ok(r + x + h)
            })?;
            cs.enforce(
                || "chain_def",
                |lc| lc + r.get_variable() + x.get_variable() + h.get_variable(),
                |lc| lc + CS::one(),
                |lc| lc + next.get_variable(),
            );
            r = next;
        }
        Ok(r)
    }
}
